use eqs_protocol::DeltaClause;

use super::tables::RuleTables;

/// Largest accepted explicit limit.
pub const MAX_LIMIT_VALUE: u32 = 1000;
/// Limit implied by "top"/"highest" without a number.
pub const DEFAULT_TOP_LIMIT: u32 = 10;
/// Refresh interval for real-time/streaming requests.
pub const REALTIME_INTERVAL_SECONDS: u32 = 1;

/// LIMIT value, 0 when unset.
pub fn extract_limit(tables: &RuleTables, query: &str) -> u32 {
    let lower = query.to_lowercase();

    for pattern in &tables.limit_patterns {
        if let Some(caps) = pattern.captures(&lower)
            && let Some(m) = caps.get(1)
            && let Ok(limit) = m.as_str().parse::<u32>()
            && (1..=MAX_LIMIT_VALUE).contains(&limit)
        {
            return limit;
        }
    }

    if lower.contains("top") || lower.contains("highest") {
        return DEFAULT_TOP_LIMIT;
    }
    0
}

/// DELTA clause for periodic refresh, if any.
pub fn extract_delta(tables: &RuleTables, query: &str) -> Option<DeltaClause> {
    let lower = query.to_lowercase();

    let every = |re: &regex::Regex| -> Option<u32> {
        re.captures(&lower)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|v| *v > 0)
    };

    if let Some(value) = every(&tables.every_seconds) {
        return Some(DeltaClause::seconds(value));
    }
    if let Some(value) = every(&tables.every_milliseconds) {
        return Some(DeltaClause::milliseconds(value));
    }

    if tables.streaming.is_match(&lower) || (lower.contains("real") && lower.contains("time")) {
        return Some(DeltaClause::seconds(REALTIME_INTERVAL_SECONDS));
    }
    None
}
