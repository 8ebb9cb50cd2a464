//! Rule-based clause extraction: natural language → EQL fragments.
//!
//! Every operation is a pure function of the query, the table path and,
//! where relevant, the entry's declared fields. The tables behind them are
//! built once ([`RuleTables`]) and shared read-only.

pub mod conditions;
pub mod fields;
pub mod limits;
pub mod nodes;
pub mod ordering;
pub mod tables;

use eqs_protocol::{DeltaClause, OrderByClause, StructuredQuery};

pub use conditions::{Conditions, render_condition};
pub use tables::{CaptureRule, CaptureRuleConfig, PatternRule, RuleOverrides, RuleTables};

use crate::error::EngineResult;

/// Derives every clause of a [`StructuredQuery`] from query text.
#[derive(Debug, Clone)]
pub struct ClauseExtractor {
    tables: RuleTables,
}

impl ClauseExtractor {
    pub fn new(tables: RuleTables) -> Self {
        Self { tables }
    }

    pub fn builtin() -> EngineResult<Self> {
        Ok(Self::new(RuleTables::builtin()?))
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn fields(&self, query: &str, table: &str, available: &[String]) -> Vec<String> {
        fields::extract_fields(&self.tables, query, table, available)
    }

    pub fn conditions(&self, query: &str, table: &str) -> Conditions {
        conditions::derive(&self.tables, query, table)
    }

    pub fn node_names(&self, query: &str) -> Vec<String> {
        nodes::extract_node_names(query)
    }

    /// Node filter followed by every derived condition, joined with `and`.
    pub fn where_clause(&self, query: &str, table: &str) -> String {
        self.build_where(query, table, None)
    }

    /// Like [`ClauseExtractor::where_clause`], but drops conditions on fields
    /// the entry does not declare. The node filter is always kept.
    pub fn where_clause_validated(&self, query: &str, table: &str, available: &[String]) -> String {
        self.build_where(query, table, Some(available))
    }

    fn build_where(&self, query: &str, table: &str, available: Option<&[String]>) -> String {
        let mut parts = Vec::new();

        if let Some(filter) = nodes::node_filter(&self.node_names(query), table) {
            parts.push(filter);
        }

        for (field, value) in self.conditions(query, table).iter() {
            if let Some(available) = available
                && !available.iter().any(|f| f == field)
            {
                continue;
            }
            parts.push(render_condition(field, value));
        }

        parts.join(" and ")
    }

    pub fn order_by(&self, query: &str, table: &str, available: &[String]) -> Vec<OrderByClause> {
        ordering::extract_order_by(query, table, available)
    }

    pub fn limit(&self, query: &str) -> u32 {
        limits::extract_limit(&self.tables, query)
    }

    pub fn delta(&self, query: &str) -> Option<DeltaClause> {
        limits::extract_delta(&self.tables, query)
    }

    /// Full statement for `table`.
    pub fn structured_query(
        &self,
        query: &str,
        table: &str,
        available: &[String],
        validate_conditions: bool,
    ) -> StructuredQuery {
        let where_clause = if validate_conditions {
            self.where_clause_validated(query, table, available)
        } else {
            self.where_clause(query, table)
        };

        StructuredQuery {
            table: table.to_string(),
            fields: self.fields(query, table, available),
            where_clause,
            order_by: self.order_by(query, table, available),
            limit: self.limit(query),
            delta: self.delta(query),
        }
    }
}
