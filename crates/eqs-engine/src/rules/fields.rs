use super::tables::RuleTables;

/// Entry fields requested by the query, in first-seen order.
///
/// A dictionary keyword present in the query selects every available field
/// whose name contains one of its fragments. Error queries against a
/// non-statistics interface table with no matching field get a `statistics`
/// hint instead.
pub fn extract_fields(
    tables: &RuleTables,
    query: &str,
    table: &str,
    available: &[String],
) -> Vec<String> {
    let lower = query.to_lowercase();
    let mut fields: Vec<String> = Vec::new();

    for (keyword, fragments) in &tables.field_keywords {
        if !lower.contains(keyword.as_str()) {
            continue;
        }
        for fragment in fragments {
            for field in available {
                if field.to_lowercase().contains(fragment.as_str()) && !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
        }
    }

    if fields.is_empty()
        && lower.contains("error")
        && table.contains("interface")
        && !table.contains("statistics")
    {
        fields.push("statistics".to_string());
    }

    fields
}
