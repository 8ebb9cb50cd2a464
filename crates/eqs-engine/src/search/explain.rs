/// Describe which literal query tokens the key contains.
pub fn explanation(literal_tokens: &[String], key: &str, score: f64) -> String {
    let key_lower = key.to_lowercase();
    let matched: Vec<&str> = literal_tokens
        .iter()
        .filter(|t| key_lower.contains(t.as_str()))
        .map(String::as_str)
        .collect();

    if matched.is_empty() {
        format!("Matched based on semantic similarity (score: {score:.1})")
    } else if matched.len() == literal_tokens.len() {
        format!(
            "Perfect match - all query terms found: {} (score: {score:.1})",
            matched.join(", ")
        )
    } else {
        format!(
            "Partial match - found {}/{} terms: {} (score: {score:.1})",
            matched.len(),
            literal_tokens.len(),
            matched.join(", ")
        )
    }
}
