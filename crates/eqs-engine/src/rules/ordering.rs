use eqs_protocol::{OrderByClause, SortDirection};

const MEMORY_SORT_FIELDS: &[&str] = &["memory-usage", "memory-utilization", "utilization", "used"];
const CPU_SORT_FIELDS: &[&str] = &["cpu-utilization", "cpu-usage", "cpu"];
const TRAFFIC_SORT_FIELDS: &[&str] = &["in-octets", "out-octets", "octets"];
const TIME_SORT_FIELDS: &[&str] = &["time-created", "last-change", "timestamp"];

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

/// First available field containing a keyword; keywords take priority over
/// field order.
fn find_sort_field(available: &[String], keywords: &[&str]) -> Option<String> {
    keywords.iter().find_map(|kw| {
        available
            .iter()
            .find(|field| field.to_lowercase().contains(kw))
            .cloned()
    })
}

/// ORDER BY clauses, appended in the order descending, ascending, time, default.
pub fn extract_order_by(query: &str, table: &str, available: &[String]) -> Vec<OrderByClause> {
    let lower = query.to_lowercase();
    let mut order_by = Vec::new();

    // ── Descending: "top", "highest", "most" ──
    if matches_any(&lower, &["top", "highest", "most"]) {
        let keywords = if lower.contains("memory") {
            Some(MEMORY_SORT_FIELDS)
        } else if lower.contains("cpu") {
            Some(CPU_SORT_FIELDS)
        } else if lower.contains("traffic") {
            Some(TRAFFIC_SORT_FIELDS)
        } else {
            None
        };
        if let Some(field) = keywords.and_then(|kw| find_sort_field(available, kw)) {
            order_by.push(OrderByClause::new(field, SortDirection::Descending));
        }
    }

    // ── Ascending: memory only ──
    if matches_any(&lower, &["lowest", "least"])
        && lower.contains("memory")
        && let Some(field) = find_sort_field(available, MEMORY_SORT_FIELDS)
    {
        order_by.push(OrderByClause::new(field, SortDirection::Ascending));
    }

    // ── Most recent alarms first ──
    if table.contains("alarm")
        && matches_any(&lower, &["recent", "latest"])
        && let Some(field) = find_sort_field(available, TIME_SORT_FIELDS)
    {
        order_by.push(OrderByClause::new(field, SortDirection::Descending));
    }

    // ── Natural sort by name when asked to sort and nothing else matched ──
    if order_by.is_empty()
        && lower.contains("sort")
        && let Some(field) = find_sort_field(available, &["name"])
    {
        order_by.push(OrderByClause::new(field, SortDirection::Ascending).with_algorithm("natural"));
    }

    order_by
}
