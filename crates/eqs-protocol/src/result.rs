use serde::{Serialize, Serializer};

use crate::query::{DeltaClause, OrderByClause, StructuredQuery};

/// One ranked match produced by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Catalog key of the matched table.
    pub key: String,
    pub score: f64,
    pub query: StructuredQuery,
    pub description: String,
    pub available_fields: Vec<String>,
    /// Plain-language note on which query terms the key contains.
    pub explanation: String,
}

impl SearchResult {
    /// The rendered EQL form of [`SearchResult::query`].
    pub fn query_string(&self) -> String {
        self.query.to_string()
    }
}

/// Wire shape used for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultJson<'a> {
    score: f64,
    query: String,
    table: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    available_fields: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    fields: &'a [String],
    #[serde(rename = "where", skip_serializing_if = "str::is_empty")]
    where_clause: &'a str,
    #[serde(skip_serializing_if = "<[OrderByClause]>::is_empty")]
    order_by: &'a [OrderByClause],
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<&'a DeltaClause>,
    #[serde(skip_serializing_if = "str::is_empty")]
    explanation: &'a str,
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResultJson {
            score: self.score,
            query: self.query_string(),
            table: &self.query.table,
            description: &self.description,
            available_fields: &self.available_fields,
            fields: &self.query.fields,
            where_clause: &self.query.where_clause,
            order_by: &self.query.order_by,
            limit: (self.query.limit > 0).then_some(self.query.limit),
            delta: self.query.delta.as_ref(),
            explanation: &self.explanation,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DeltaClause, SortDirection};

    fn sample() -> SearchResult {
        let mut query = StructuredQuery::new(".namespace.node.srl.interface.statistics");
        query.fields = vec!["in-octets".into()];
        query.order_by = vec![OrderByClause::new("in-octets", SortDirection::Descending)];
        query.limit = 5;
        query.delta = Some(DeltaClause::seconds(5));
        SearchResult {
            key: query.table.clone(),
            score: 72.5,
            query,
            description: "Interface counters".into(),
            available_fields: vec!["in-octets".into(), "out-octets".into()],
            explanation: String::new(),
        }
    }

    #[test]
    fn json_shape_uses_camel_case_and_rendered_query() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["score"], 72.5);
        assert_eq!(json["table"], ".namespace.node.srl.interface.statistics");
        assert_eq!(json["availableFields"][1], "out-octets");
        assert_eq!(json["orderBy"][0]["direction"], "descending");
        assert_eq!(json["limit"], 5);
        assert_eq!(json["delta"]["unit"], "seconds");
        assert!(
            json["query"]
                .as_str()
                .unwrap()
                .ends_with("limit 5 delta seconds 5")
        );
    }

    #[test]
    fn json_omits_empty_optionals() {
        let result = SearchResult {
            key: ".a".into(),
            score: 1.0,
            query: StructuredQuery::new(".a"),
            description: String::new(),
            available_fields: Vec::new(),
            explanation: String::new(),
        };
        let json = serde_json::to_value(result).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["query", "score", "table"]);
    }
}
