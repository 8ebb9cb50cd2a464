//! Structured EQL statements and their textual form.
//!
//! Rendering grammar:
//!
//! ```text
//! <table> [fields [a, b]] [where (<predicate>)] [order by [f dir [algo], ...]] [limit N] [delta <unit> N]
//! ```
//!
//! `FromStr` parses the same grammar back, so a rendered query round-trips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Sort direction ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            other => Err(QueryParseError::Direction(other.to_string())),
        }
    }
}

// ── Order by ──────────────────────────────────────────────────

/// One ORDER BY element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByClause {
    pub field: String,
    pub direction: SortDirection,
    /// Optional sort algorithm, e.g. `natural`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl OrderByClause {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            algorithm: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }
}

impl fmt::Display for OrderByClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)?;
        if let Some(algorithm) = &self.algorithm {
            write!(f, " {algorithm}")?;
        }
        Ok(())
    }
}

// ── Delta ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaUnit {
    Seconds,
    Milliseconds,
}

impl DeltaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Milliseconds => "milliseconds",
        }
    }
}

impl fmt::Display for DeltaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeltaUnit {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconds" => Ok(Self::Seconds),
            "milliseconds" => Ok(Self::Milliseconds),
            other => Err(QueryParseError::DeltaUnit(other.to_string())),
        }
    }
}

/// Refresh interval for streaming queries. `value` is always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaClause {
    pub unit: DeltaUnit,
    pub value: u32,
}

impl DeltaClause {
    pub fn seconds(value: u32) -> Self {
        Self {
            unit: DeltaUnit::Seconds,
            value,
        }
    }

    pub fn milliseconds(value: u32) -> Self {
        Self {
            unit: DeltaUnit::Milliseconds,
            value,
        }
    }
}

// ── Structured query ──────────────────────────────────────────

/// An EQL statement derived from natural language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub table: String,
    /// Requested fields; insertion order is meaningful.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Boolean predicate, empty when absent.
    #[serde(rename = "where", default, skip_serializing_if = "String::is_empty")]
    pub where_clause: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByClause>,
    /// 0 means unset.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<DeltaClause>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl StructuredQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for StructuredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;

        if !self.fields.is_empty() {
            write!(f, " fields [{}]", self.fields.join(", "))?;
        }

        if !self.where_clause.is_empty() {
            write!(f, " where ({})", self.where_clause)?;
        }

        if !self.order_by.is_empty() {
            let parts: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
            write!(f, " order by [{}]", parts.join(", "))?;
        }

        if self.limit > 0 {
            write!(f, " limit {}", self.limit)?;
        }

        if let Some(delta) = &self.delta {
            write!(f, " delta {} {}", delta.unit, delta.value)?;
        }

        Ok(())
    }
}

// ── Parsing ───────────────────────────────────────────────────

/// Errors produced when parsing a rendered query string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("query string is empty")]
    Empty,

    #[error("unterminated {0} section")]
    Unterminated(&'static str),

    #[error("invalid order by element: {0}")]
    OrderBy(String),

    #[error("unknown sort direction: {0}")]
    Direction(String),

    #[error("unknown delta unit: {0}")]
    DeltaUnit(String),

    #[error("invalid number in {section}: {value}")]
    Number { section: &'static str, value: String },

    #[error("unexpected input: {0}")]
    Trailing(String),
}

impl FromStr for StructuredQuery {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (table, mut rest) = match s.split_once(' ') {
            Some((t, r)) => (t, r),
            None => (s, ""),
        };
        if table.is_empty() {
            return Err(QueryParseError::Empty);
        }

        let mut query = StructuredQuery::new(table);

        if let Some(after) = rest.strip_prefix("fields [") {
            let end = after
                .find(']')
                .ok_or(QueryParseError::Unterminated("fields"))?;
            query.fields = split_list(&after[..end]);
            rest = after[end + 1..].trim_start();
        }

        if let Some(after) = rest.strip_prefix("where (") {
            let end = closing_paren(after).ok_or(QueryParseError::Unterminated("where"))?;
            query.where_clause = after[..end].to_string();
            rest = after[end + 1..].trim_start();
        }

        if let Some(after) = rest.strip_prefix("order by [") {
            let end = after
                .find(']')
                .ok_or(QueryParseError::Unterminated("order by"))?;
            query.order_by = split_list(&after[..end])
                .iter()
                .map(|part| parse_order_element(part))
                .collect::<Result<_, _>>()?;
            rest = after[end + 1..].trim_start();
        }

        if let Some(after) = rest.strip_prefix("limit ") {
            let (value, tail) = after.split_once(' ').unwrap_or((after, ""));
            query.limit = parse_number("limit", value)?;
            rest = tail.trim_start();
        }

        if let Some(after) = rest.strip_prefix("delta ") {
            let mut parts = after.split_whitespace();
            let unit = parts
                .next()
                .ok_or(QueryParseError::Unterminated("delta"))?
                .parse::<DeltaUnit>()?;
            let value = parts.next().ok_or(QueryParseError::Unterminated("delta"))?;
            query.delta = Some(DeltaClause {
                unit,
                value: parse_number("delta", value)?,
            });
            let leftover: Vec<&str> = parts.collect();
            rest = if leftover.is_empty() { "" } else { after };
        }

        if !rest.trim().is_empty() {
            return Err(QueryParseError::Trailing(rest.trim().to_string()));
        }

        Ok(query)
    }
}

fn split_list(inner: &str) -> Vec<String> {
    inner
        .split(", ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_order_element(part: &str) -> Result<OrderByClause, QueryParseError> {
    let mut words = part.split_whitespace();
    let (Some(field), Some(direction)) = (words.next(), words.next()) else {
        return Err(QueryParseError::OrderBy(part.to_string()));
    };
    let mut clause = OrderByClause::new(field, direction.parse()?);
    if let Some(algorithm) = words.next() {
        clause = clause.with_algorithm(algorithm);
    }
    if words.next().is_some() {
        return Err(QueryParseError::OrderBy(part.to_string()));
    }
    Ok(clause)
}

fn parse_number(section: &'static str, value: &str) -> Result<u32, QueryParseError> {
    value.parse().map_err(|_| QueryParseError::Number {
        section,
        value: value.to_string(),
    })
}

/// Byte offset of the `)` closing a predicate, skipping quoted strings and
/// nested parentheses.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
