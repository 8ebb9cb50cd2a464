//! Query and path tokenization.
//!
//! Text is lowercased, `.`/`-`/`_` become word breaks, and stop words are
//! dropped only when at least two meaningful words remain, so short queries
//! made mostly of stop words survive intact.

use std::collections::{HashMap, HashSet};

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "what", "which", "who", "when",
    "where", "how", "why", "that", "this", "these", "those", "i", "me", "my", "mine", "we", "us",
    "our", "ours", "you", "your", "yours", "he", "him", "his", "she", "her", "hers", "it", "its",
    "they", "them", "their", "theirs",
];

/// Operative words that are never filtered.
const KEEP_WORDS: &[&str] = &["all", "show", "get", "list"];

/// One-to-one substitutions: plurals, abbreviations and common typos.
const SYNONYMS: &[(&str, &str)] = &[
    ("stats", "statistics"),
    ("stat", "statistics"),
    ("alarms", "alarm"),
    ("alarm", "alarms"),
    ("fanspeed", "fan"),
    ("fan-speed", "fan"),
    ("temp", "temperature"),
    ("temps", "temperature"),
    ("interswitch", "link"),
    ("links", "link"),
    ("iface", "interface"),
    ("ifaces", "interface"),
    ("intf", "interface"),
    ("intfs", "interface"),
    ("interfaces", "interface"),
    ("neighbors", "neighbor"),
    ("routes", "route"),
    ("metrics", "metric"),
    ("info", "information"),
    ("config", "configure"),
    ("configuration", "configure"),
    // typos
    ("inferface", "interface"),
    ("inferfaces", "interface"),
    ("interace", "interface"),
    ("intrface", "interface"),
    ("interfce", "interface"),
    ("interfacs", "interface"),
    ("interfaes", "interface"),
    ("inerface", "interface"),
    ("inerfaces", "interface"),
    ("statitics", "statistics"),
    ("statsitics", "statistics"),
    ("statistcs", "statistics"),
    ("statistis", "statistics"),
    ("neighors", "neighbor"),
    ("neigbors", "neighbor"),
    ("routers", "router"),
    ("sysem", "system"),
    ("systm", "system"),
    ("bandwith", "bandwidth"),
    ("bandwdth", "bandwidth"),
    ("alrms", "alarm"),
    ("alrm", "alarm"),
    ("confg", "configure"),
    ("cofig", "configure"),
    ("usge", "usage"),
    ("useage", "usage"),
    ("dwn", "down"),
    ("drps", "drops"),
    ("drop", "drops"),
];

/// Minimum length (bytes) for a token to count as meaningful.
pub const MIN_TOKEN_LENGTH: usize = 2;

/// Stateless tokenizer over fixed vocabulary tables.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<&'static str>,
    keep_words: HashSet<&'static str>,
    synonyms: HashMap<&'static str, &'static str>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            keep_words: KEEP_WORDS.iter().copied().collect(),
            synonyms: SYNONYMS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Split `text` into lowercase tokens, conditionally dropping stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.to_lowercase().replace(['.', '-', '_'], " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let meaningful = tokens
            .iter()
            .filter(|t| !self.is_stop_word(t) && t.len() >= MIN_TOKEN_LENGTH)
            .count();

        if meaningful < 2 {
            return tokens.into_iter().map(String::from).collect();
        }

        tokens
            .into_iter()
            .filter(|t| !self.is_stop_word(t) || self.keep_words.contains(*t))
            .map(String::from)
            .collect()
    }

    /// Replace each token with its canonical form. Order and count are preserved.
    pub fn expand_synonyms(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| match self.synonyms.get(t.as_str()) {
                Some(canonical) => (*canonical).to_string(),
                None => t.clone(),
            })
            .collect()
    }

    /// Tokenize and expand a query once for a whole search call.
    pub fn query_terms(&self, query: &str) -> QueryTerms {
        let literal = self.tokenize(query);
        let tokens = self.expand_synonyms(&literal);
        let bigrams = bigrams(&tokens);
        QueryTerms {
            raw: query.to_string(),
            lower: query.to_lowercase(),
            literal,
            tokens,
            bigrams,
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Space-joined adjacent token pairs.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Everything derived from a query string, computed once per search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryTerms {
    /// The query exactly as given.
    pub raw: String,
    pub lower: String,
    /// Tokenizer output before synonym expansion.
    pub literal: Vec<String>,
    /// Synonym-expanded tokens used for retrieval and scoring.
    pub tokens: Vec<String>,
    pub bigrams: Vec<String>,
}

impl QueryTerms {
    pub fn has_token(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t == word)
    }
}
