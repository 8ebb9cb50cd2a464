//! Text and JSON rendering of ranked results.

use std::fmt::Write as _;

use eqs_protocol::SearchResult;
use serde::Serialize;

/// Results listed after the top match.
pub const MAX_OTHERS: usize = 9;

pub const NO_MATCHES_TEXT: &str = "No matches found";
pub const NO_MATCHES_JSON: &str = r#"{"error": "No matches found", "results": []}"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    top_match: &'a SearchResult,
    #[serde(skip_serializing_if = "<[SearchResult]>::is_empty")]
    others: &'a [SearchResult],
}

fn others(results: &[SearchResult]) -> &[SearchResult] {
    let end = results.len().min(MAX_OTHERS + 1);
    results.get(1..end).unwrap_or(&[])
}

/// Human-readable listing: the top match in full, then up to nine others.
pub fn render_text(results: &[SearchResult], explain: bool) -> String {
    let Some(top) = results.first() else {
        return NO_MATCHES_TEXT.to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Top match (score: {:.2}):", top.score);
    let _ = write!(out, "{}", top.query);
    if explain && !top.explanation.is_empty() {
        let _ = write!(out, "\n{}", top.explanation);
    }
    if !top.description.is_empty() {
        let _ = write!(out, "\n\nDescription: {}", top.description);
    }
    if !top.available_fields.is_empty() {
        let _ = write!(out, "\nAvailable fields: {}", top.available_fields.join(", "));
    }

    let rest = others(results);
    if !rest.is_empty() {
        out.push_str("\n\nOther possible matches:");
        for (i, other) in rest.iter().enumerate() {
            let _ = write!(out, "\n{}. {} (score: {:.2})", i + 1, other.query, other.score);
            if explain && !other.explanation.is_empty() {
                let _ = write!(out, "\n   {}", other.explanation);
            }
            if !other.description.is_empty() {
                let _ = write!(out, "\n   Description: {}", other.description);
            }
            if !other.available_fields.is_empty() {
                let _ = write!(
                    out,
                    "\n   Available fields: {}",
                    other.available_fields.join(", ")
                );
            }
        }
    }
    out
}

/// `{"topMatch": ..., "others": [...]}`, pretty-printed.
pub fn render_json(results: &[SearchResult]) -> serde_json::Result<String> {
    let Some(top) = results.first() else {
        return Ok(NO_MATCHES_JSON.to_string());
    };
    serde_json::to_string_pretty(&JsonOutput {
        top_match: top,
        others: others(results),
    })
}
