//! Node-name extraction for node-scoped tables.

/// Words that never name a node, even after "on"/"for"/"from".
const SKIP_WORDS: &[&str] = &[
    "nodes", "node", "my", "the", "bgp", "ospf", "isis", "mpls", "interface", "interfaces",
    "router", "system", "all", "any", "errors", "error", "drops", "drop", "statistics", "stats",
    "status", "configuration", "config", "state", "up", "down", "active", "inactive",
];

const PREPOSITIONS: &[&str] = &["on", "for", "from"];

/// Path fragment marking tables whose rows carry a node name.
pub const NODE_SCOPE_MARKER: &str = ".namespace.node.";

fn clean_punctuation(word: &str) -> &str {
    let word = word.strip_suffix('?').unwrap_or(word);
    let word = word.strip_suffix('!').unwrap_or(word);
    let word = word.strip_suffix('.').unwrap_or(word);
    word.strip_suffix(',').unwrap_or(word)
}

fn is_generic_reference(word: &str) -> bool {
    matches!(word, "nodes" | "node" | "my")
}

/// `leaf1`, `spine12`: a leaf/spine prefix followed by anything ending in a digit.
fn looks_like_node(word: &str) -> bool {
    (word.starts_with("leaf") || word.starts_with("spine"))
        && word.len() > 4
        && word.ends_with(|c: char| c.is_ascii_digit())
}

/// All distinct node names in the query, in order of appearance.
pub fn extract_node_names(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let mut names: Vec<String> = Vec::new();

    let mut push = |name: &str| {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    for (i, raw) in words.iter().enumerate() {
        let word = clean_punctuation(raw);
        if is_generic_reference(word) {
            continue;
        }

        if looks_like_node(word) {
            push(word);
        }

        if PREPOSITIONS.contains(&word)
            && let Some(next) = words.get(i + 1)
        {
            let next = clean_punctuation(next);
            if !SKIP_WORDS.contains(&next) && next.len() > 1 {
                push(next);
            }
        }
    }

    names
}

/// Render the node filter, or `None` when there is nothing to filter on or
/// the table is not node-scoped.
pub fn node_filter(names: &[String], table: &str) -> Option<String> {
    if names.is_empty() || !table.contains(NODE_SCOPE_MARKER) {
        return None;
    }
    match names {
        [single] => Some(format!(".namespace.node.name = {single:?}")),
        many => {
            let quoted: Vec<String> = many.iter().map(|n| format!("{n:?}")).collect();
            Some(format!(".namespace.node.name in [{}]", quoted.join(", ")))
        }
    }
}
