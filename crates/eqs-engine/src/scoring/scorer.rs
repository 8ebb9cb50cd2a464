//! Relevance scoring of one catalog entry against a query.
//!
//! The score is an unnormalized sum of independent heuristics. Each one is
//! kept separately in [`ScoreBreakdown`] so rankings can be explained.

use eqs_protocol::{CatalogEntry, EntryInfo};
use serde::Serialize;

use super::weights::ScoringWeights;
use crate::rules::ClauseExtractor;
use crate::tokenizer::{QueryTerms, Tokenizer};

const SESSION_STATE_WORDS: &[&str] = &[
    "established",
    "down",
    "up",
    "active",
    "session",
    "state",
    "status",
];
const ROUTING_PROTOCOLS: &[&str] = &["bgp", "ospf", "isis"];

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

fn bonus(condition: bool, weight: f64) -> f64 {
    if condition { weight } else { 0.0 }
}

/// Per-heuristic contributions to an entry's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub description: f64,
    pub show_state: f64,
    pub interface: f64,
    pub bgp: f64,
    pub segment: f64,
    pub suffix: f64,
    pub bigram: f64,
    pub sequence: f64,
    pub subinterface: f64,
    pub fields: f64,
    pub special: f64,
    pub depth: f64,
    pub penalty: f64,
}

impl ScoreBreakdown {
    /// Sum of all contributions, always added in the same order.
    pub fn total(&self) -> f64 {
        self.keyword
            + self.description
            + self.show_state
            + self.interface
            + self.bgp
            + self.segment
            + self.suffix
            + self.bigram
            + self.sequence
            + self.subinterface
            + self.fields
            + self.special
            + self.depth
            + self.penalty
    }
}

/// Borrowed view over the immutable tables needed for scoring.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    weights: &'a ScoringWeights,
    tokenizer: &'a Tokenizer,
    extractor: &'a ClauseExtractor,
}

impl<'a> Scorer<'a> {
    pub fn new(
        weights: &'a ScoringWeights,
        tokenizer: &'a Tokenizer,
        extractor: &'a ClauseExtractor,
    ) -> Self {
        Self {
            weights,
            tokenizer,
            extractor,
        }
    }

    pub fn score_entry(&self, key: &str, entry: &CatalogEntry, terms: &QueryTerms) -> f64 {
        self.breakdown(key, entry, terms).total()
    }

    pub fn breakdown(&self, key: &str, entry: &CatalogEntry, terms: &QueryTerms) -> ScoreBreakdown {
        let w = self.weights;
        let words = terms.tokens.as_slice();
        let query = terms.lower.as_str();
        let key_lower = key.to_lowercase();

        let key_tokens = self.tokenizer.tokenize(key);
        let text_tokens = self
            .tokenizer
            .tokenize(&format!("{} {}", entry.reference_text, entry.text));

        let info = EntryInfo::try_parse(&entry.text);
        let available = info.as_ref().map(|i| i.fields.as_slice()).unwrap_or(&[]);
        let extracted = self.extractor.fields(&terms.raw, key, available);

        ScoreBreakdown {
            keyword: self.keyword_score(&key_tokens, &text_tokens, words),
            description: info
                .as_ref()
                .map(|i| self.description_score(query, &i.description, words))
                .unwrap_or(0.0),
            show_state: bonus(
                format!("{query} {key}").contains("show") && key.contains(".state."),
                w.show_state_bonus,
            ),
            interface: if query.contains("interface") {
                self.interface_score(query, key, &key_lower)
            } else {
                0.0
            },
            bgp: self.bgp_score(query, key),
            segment: self.segment_score(&key_lower, words),
            suffix: words
                .iter()
                .map(|word| bonus(key.ends_with(&format!(".{word}")), w.exact_table_match))
                .sum(),
            bigram: terms
                .bigrams
                .iter()
                .map(|bigram| bonus(key_lower.contains(&bigram.replace(' ', ".")), w.bigram_match))
                .sum(),
            sequence: self.sequence_score(query, key),
            subinterface: self.subinterface_score(query, key),
            fields: extracted.len() as f64 * w.field_extract,
            special: self.special_score(query, key, &extracted),
            depth: self.depth_score(&key_tokens),
            penalty: self.penalty_score(query, key),
        }
    }

    // ── Keyword and description ───────────────────────────────

    fn keyword_score(&self, key_tokens: &[String], text_tokens: &[String], words: &[String]) -> f64 {
        let w = self.weights;
        let mut score = 0.0;

        if let Some(last) = key_tokens.last() {
            score += words.iter().filter(|word| *word == last).count() as f64 * w.last_segment_match;
        }

        let mut path_matches = 0;
        for word in words {
            if key_tokens.contains(word) {
                path_matches += 1;
                score += match word.as_str() {
                    "interface" | "interfaces" => w.keyword_match_interface,
                    "statistics" => w.keyword_match_statistics,
                    "state" | "configure" => w.keyword_match_state,
                    _ => w.keyword_match_default,
                };
            } else if text_tokens.contains(word) {
                score += w.text_match;
            }
        }

        if words.len() > 1 && path_matches == words.len() {
            score += words.len() as f64 * w.all_words_match_bonus;
        }
        score
    }

    fn description_score(&self, query: &str, description: &str, words: &[String]) -> f64 {
        let w = self.weights;
        let desc_tokens = self.tokenizer.tokenize(description);
        let combined = format!("{query} {}", description.to_lowercase());

        let matched = words.iter().filter(|word| desc_tokens.contains(word)).count();
        let mut score = matched as f64 * w.description_word_match;

        for (query_phrase, desc_phrase, weight) in [
            ("list of", "list of", w.description_list_match),
            ("all", "all", w.description_all_match),
            ("show", "display", w.description_show_match),
            ("get", "retrieve", w.description_get_match),
        ] {
            score += bonus(
                combined.contains(query_phrase) && combined.contains(desc_phrase),
                weight,
            );
        }

        score + bonus(
            matched >= 2 && matched >= words.len() / 2,
            w.description_multi_match,
        )
    }

    // ── Domain context ────────────────────────────────────────

    fn interface_score(&self, query: &str, key: &str, key_lower: &str) -> f64 {
        let w = self.weights;
        let mut score = bonus(
            matches_any(key_lower, &["violator", "security"]),
            w.interface_security_penalty,
        );

        score += bonus(
            key.ends_with(".interface") && !key.contains(".protocols."),
            w.interface_end_match,
        );
        score += bonus(
            query.contains("statistics") && key.ends_with(".interface.statistics"),
            w.interface_stats_match,
        );
        score += bonus(
            query.contains("interfaces") && key.ends_with(".interface"),
            w.interface_plural_match,
        );

        let protocol_in_query = matches_any(query, ROUTING_PROTOCOLS);
        let protocol_in_key = matches_any(
            key_lower,
            &["protocols.bgp", "protocols.ospf", "protocols.isis"],
        );
        score + bonus(
            !protocol_in_query && protocol_in_key,
            w.interface_protocol_penalty,
        )
    }

    fn bgp_score(&self, query: &str, key: &str) -> f64 {
        if !query.contains("bgp") {
            return 0.0;
        }
        let w = self.weights;
        let mut score = 0.0;

        if matches_any(query, &["neighbor", "session", "peer"]) {
            let session_words = matches_any(query, SESSION_STATE_WORDS);
            score += bonus(key.contains("bgp") && key.contains(".neighbor"), w.bgp_neighbor_match);
            score += bonus(session_words && key.ends_with(".neighbor"), w.bgp_session_state_bonus);
            score += bonus(session_words && !key.contains(".neighbor"), w.bgp_non_neighbor_penalty);
            score += bonus(
                session_words && key.contains("maintenance") && !query.contains("maintenance"),
                w.bgp_maintenance_session_penalty,
            );
        }

        if !query.contains("neighbor") && !query.contains("session") {
            score += bonus(key.contains("bgp"), w.bgp_general_match);
        }

        score + bonus(key.contains("maintenance"), w.bgp_maintenance_penalty)
    }

    // ── Path shape ────────────────────────────────────────────

    /// Bonus by how many `.` separators follow the first occurrence of each word.
    fn segment_score(&self, key_lower: &str, words: &[String]) -> f64 {
        let w = self.weights;
        words
            .iter()
            .filter_map(|word| {
                let idx = key_lower.find(word.as_str())?;
                let dots = key_lower[idx + word.len()..].matches('.').count();
                Some(match dots {
                    0 => w.segment_exact_match,
                    1 => w.segment_near_match,
                    2..=3 => w.segment_far_match,
                    _ => 0.0,
                })
            })
            .sum()
    }

    fn sequence_score(&self, query: &str, key: &str) -> f64 {
        if !(query.contains("interface") && query.contains("statistics")) {
            return 0.0;
        }
        if key.contains("interface.statistics") {
            self.weights.sequence_match
        } else if key.contains("interface") && key.contains("statistics") {
            self.weights.sequence_partial_match
        } else {
            0.0
        }
    }

    fn subinterface_score(&self, query: &str, key: &str) -> f64 {
        if !(query.contains("subinterface") && key.contains("subinterface")) {
            return 0.0;
        }
        if key.ends_with(".subinterface") {
            self.weights.subinterface_exact_match
        } else {
            self.weights.subinterface_partial_match
        }
    }

    /// Segments past the first three that are not `state`/`configure`.
    fn depth_score(&self, key_tokens: &[String]) -> f64 {
        if key_tokens.is_empty() {
            return 0.0;
        }
        let w = self.weights;
        let depth = key_tokens
            .iter()
            .skip(3)
            .filter(|t| *t != "state" && *t != "configure")
            .count();
        match depth {
            0..=2 => w.path_depth_bonus_2,
            3 => w.path_depth_bonus_3,
            4 => w.path_depth_bonus_4,
            d => -((d - 4) as f64) * w.path_depth_penalty_factor,
        }
    }

    // ── Field presence and penalties ──────────────────────────

    fn special_score(&self, query: &str, key: &str, extracted: &[String]) -> f64 {
        let w = self.weights;
        let mut score = 0.0;
        if query.contains("error")
            && key.contains("statistics")
            && extracted.iter().any(|f| f.contains("error"))
        {
            score += w.error_field_bonus;
        }
        if query.contains("bandwidth")
            && key.contains("interface")
            && extracted
                .iter()
                .any(|f| f.contains("octets") || f.contains("bandwidth"))
        {
            score += w.bandwidth_field_bonus;
        }
        score
    }

    fn penalty_score(&self, query: &str, key: &str) -> f64 {
        let w = self.weights;
        let protocols = key.contains("protocols")
            && !query.contains("protocol")
            && !matches_any(query, ROUTING_PROTOCOLS);
        let maintenance = key.contains("maintenance") && !query.contains("maintenance");
        bonus(protocols, w.protocol_penalty) + bonus(maintenance, w.maintenance_penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        weights: ScoringWeights,
        tokenizer: Tokenizer,
        extractor: ClauseExtractor,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                weights: ScoringWeights::default(),
                tokenizer: Tokenizer::new(),
                extractor: ClauseExtractor::builtin().unwrap(),
            }
        }

        fn scorer(&self) -> Scorer<'_> {
            Scorer::new(&self.weights, &self.tokenizer, &self.extractor)
        }

        fn breakdown(&self, query: &str, key: &str, entry: &CatalogEntry) -> ScoreBreakdown {
            let terms = self.tokenizer.query_terms(query);
            self.scorer().breakdown(key, entry, &terms)
        }
    }

    const IFACE: &str = ".namespace.node.srl.interface";
    const IFACE_STATS: &str = ".namespace.node.srl.interface.statistics";
    const BGP_NEIGHBOR: &str = ".namespace.node.srl.network-instance.protocols.bgp.neighbor";

    #[test]
    fn keyword_score_rewards_full_path_coverage() {
        let f = Fixture::new();
        let b = f.breakdown("interface statistics", IFACE_STATS, &CatalogEntry::default());
        // last segment 10 + interface 8 + statistics 6 + 2 words × 3
        assert_eq!(b.keyword, 30.0);
        assert_eq!(b.sequence, 8.0);
        assert_eq!(b.suffix, 6.0);
        assert_eq!(b.bigram, 2.0);
        // "interface" has one separator after it, "statistics" none
        assert_eq!(b.segment, 16.0);
    }

    #[test]
    fn text_only_match_earns_partial_credit() {
        let f = Fixture::new();
        let entry = CatalogEntry::new("ethernet ports", "");
        let b = f.breakdown("ethernet ports", ".namespace.node.srl.platform.linecard", &entry);
        assert_eq!(b.keyword, 2.0);
    }

    #[test]
    fn plural_interfaces_prefers_bare_interface_table() {
        let f = Fixture::new();
        let b = f.breakdown("show interfaces", IFACE, &CatalogEntry::default());
        assert_eq!(b.interface, 30.0);

        let stats = f.breakdown("show interfaces", IFACE_STATS, &CatalogEntry::default());
        assert_eq!(stats.interface, 0.0);
    }

    #[test]
    fn interface_rules_penalize_security_and_protocol_paths() {
        let f = Fixture::new();
        let b = f.breakdown(
            "interface list",
            ".namespace.node.srl.interface.ethernet.security-violator",
            &CatalogEntry::default(),
        );
        assert_eq!(b.interface, -20.0);

        let b = f.breakdown(
            "interface list",
            ".namespace.node.srl.network-instance.protocols.isis.instance.interface",
            &CatalogEntry::default(),
        );
        assert_eq!(b.interface, -15.0);
    }

    #[test]
    fn bgp_session_queries_prefer_neighbor_table() {
        let f = Fixture::new();
        let entry = CatalogEntry::default();
        assert_eq!(f.breakdown("bgp neighbors down", BGP_NEIGHBOR, &entry).bgp, 35.0);
        assert_eq!(
            f.breakdown(
                "bgp neighbors down",
                ".namespace.node.srl.network-instance.protocols.bgp.group",
                &entry
            )
            .bgp,
            -15.0
        );
        assert_eq!(
            f.breakdown(
                "bgp neighbors down",
                ".namespace.node.srl.network-instance.protocols.bgp.maintenance",
                &entry
            )
            .bgp,
            -50.0
        );
    }

    #[test]
    fn general_bgp_query_gets_flat_bonus() {
        let f = Fixture::new();
        let b = f.breakdown(
            "bgp configuration",
            ".namespace.node.srl.network-instance.protocols.bgp",
            &CatalogEntry::default(),
        );
        assert_eq!(b.bgp, 10.0);
    }

    #[test]
    fn depth_shaping_prefers_short_paths() {
        let f = Fixture::new();
        let entry = CatalogEntry::default();
        assert_eq!(f.breakdown("x", IFACE, &entry).depth, 20.0);
        // network instance protocols bgp neighbor → 5 meaningful segments
        assert_eq!(f.breakdown("x", BGP_NEIGHBOR, &entry).depth, -2.0);
        // state segments do not count
        assert_eq!(
            f.breakdown("x", ".namespace.node.sros.state.port.ethernet", &entry).depth,
            20.0
        );
    }

    #[test]
    fn penalties_for_unrequested_protocols_and_maintenance() {
        let f = Fixture::new();
        let entry = CatalogEntry::default();
        assert_eq!(f.breakdown("show neighbors", BGP_NEIGHBOR, &entry).penalty, -10.0);
        assert_eq!(f.breakdown("bgp neighbors", BGP_NEIGHBOR, &entry).penalty, 0.0);
        assert_eq!(
            f.breakdown("system", ".namespace.node.srl.system.maintenance", &entry).penalty,
            -8.0
        );
    }

    #[test]
    fn error_fields_earn_special_bonus() {
        let f = Fixture::new();
        let entry = CatalogEntry::with_info("", "Interface counters", &["in-errors", "out-errors", "in-octets"]);
        let b = f.breakdown("interface errors", IFACE_STATS, &entry);
        assert_eq!(b.fields, 3.0);
        assert_eq!(b.special, 10.0);
    }

    #[test]
    fn description_matches_and_phrase_bonuses() {
        let f = Fixture::new();
        let entry = CatalogEntry::with_info("", "Display the list of all interface counters", &[]);
        let b = f.breakdown("show list of all interface counters", IFACE_STATS, &entry);
        // words: show list all interface counters → list, all, interface, counters match (4 × 3)
        // phrases: list of 5 + all 3 + show/display 2, multi-match 5
        assert_eq!(b.description, 12.0 + 5.0 + 3.0 + 2.0 + 5.0);
    }

    #[test]
    fn malformed_text_scores_no_description() {
        let f = Fixture::new();
        let entry = CatalogEntry::new("", "{not json");
        let b = f.breakdown("list of all interfaces", IFACE, &entry);
        assert_eq!(b.description, 0.0);
        assert_eq!(b.fields, 0.0);
    }

    #[test]
    fn show_state_bonus_needs_state_segment() {
        let f = Fixture::new();
        let entry = CatalogEntry::default();
        assert_eq!(
            f.breakdown("show port", ".namespace.node.sros.state.port", &entry).show_state,
            5.0
        );
        assert_eq!(f.breakdown("show port", IFACE, &entry).show_state, 0.0);
    }

    #[test]
    fn subinterface_bonus() {
        let f = Fixture::new();
        let entry = CatalogEntry::default();
        let exact = f.breakdown("subinterface list", ".namespace.node.srl.interface.subinterface", &entry);
        assert_eq!(exact.subinterface, 10.0);
        let partial = f.breakdown(
            "subinterface list",
            ".namespace.node.srl.interface.subinterface.ipv4",
            &entry,
        );
        assert_eq!(partial.subinterface, 2.0);
    }

    #[test]
    fn score_is_reproducible_and_equals_breakdown_total() {
        let f = Fixture::new();
        let entry = CatalogEntry::with_info("interface counters", "Interface statistics", &["in-octets"]);
        let terms = f.tokenizer.query_terms("show interface stats bandwidth on leaf1");
        let scorer = f.scorer();
        let a = scorer.score_entry(IFACE_STATS, &entry, &terms);
        let b = scorer.score_entry(IFACE_STATS, &entry, &terms);
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(a, scorer.breakdown(IFACE_STATS, &entry, &terms).total());
    }

    #[test]
    fn empty_query_scores_without_panicking() {
        let f = Fixture::new();
        let b = f.breakdown("", IFACE, &CatalogEntry::default());
        assert_eq!(b.keyword, 0.0);
        assert_eq!(b.segment, 0.0);
    }
}
