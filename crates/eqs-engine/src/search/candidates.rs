//! Candidate generation from the inverted index.

use std::collections::HashMap;

use eqs_protocol::{Catalog, CatalogEntry, Platform};

use super::tuning::SearchTuning;
use crate::tokenizer::QueryTerms;

/// Key of the alarm table, which no catalog file carries.
pub const ALARM_TABLE: &str = ".namespace.alarms.v1.alarm";
pub const ALARM_DESCRIPTION: &str = "Active alarms in the system";
pub const ALARM_FIELDS: &[&str] = &["severity", "text", "time-created", "acknowledged"];

/// Synthetic catalog entry for [`ALARM_TABLE`].
pub fn alarm_entry() -> CatalogEntry {
    CatalogEntry::with_info("", ALARM_DESCRIPTION, ALARM_FIELDS)
}

/// Score of the alarm pseudo-table for these tokens; 0 means "not an alarm query".
pub fn alarm_score(tokens: &[String], tuning: &SearchTuning) -> f64 {
    tokens
        .iter()
        .map(|t| match t.as_str() {
            "alarm" | "alarms" => tuning.alarm_word_score,
            "critical" | "major" | "minor" => tuning.alarm_severity_score,
            _ => 0.0,
        })
        .sum()
}

/// Whether the SR OS interface widening applies to this query.
fn widen_for_interfaces(terms: &QueryTerms, sros_catalog: bool) -> bool {
    (sros_catalog || Platform::detect_from_query(&terms.raw) == Platform::Sros)
        && (terms.has_token("interface") || terms.has_token("interfaces"))
}

/// Keys named by the index for any query token, with per-key hit counts.
///
/// Repeated tokens count repeatedly. On SR OS, interface queries also pull
/// in every key indexed under a word containing `interface`.
pub fn index_hits<'c>(
    catalog: &'c Catalog,
    terms: &QueryTerms,
    sros_catalog: bool,
) -> HashMap<&'c str, u32> {
    let mut hits: HashMap<&'c str, u32> = HashMap::new();

    for token in &terms.tokens {
        for key in catalog.postings(token) {
            *hits.entry(key.as_str()).or_default() += 1;
        }
    }

    if widen_for_interfaces(terms, sros_catalog) {
        let before = hits.len();
        for (word, keys) in &catalog.inverted_index {
            if word.contains("interface") {
                for key in keys {
                    *hits.entry(key.as_str()).or_default() += 1;
                }
            }
        }
        tracing::debug!(
            added = hits.len() - before,
            "widened candidates with interface-related keys"
        );
    }

    hits
}
