//! WHERE-condition derivation as an ordered list of stages.
//!
//! Stage order matters: a later stage overwrites the value of a field set by
//! an earlier one, keeping the field's original position.

use super::tables::{RuleTables, table_allows};

/// Field → value pairs in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    entries: Vec<(String, String)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, overwriting in place if already present.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }
}

/// Render one condition. Operator-prefixed values are emitted raw, all
/// others as a quoted equality.
pub fn render_condition(field: &str, value: &str) -> String {
    if value.starts_with(['>', '<', '=', '!', '~']) {
        format!("{field} {value}")
    } else {
        format!("{field} = {value:?}")
    }
}

/// A single derivation stage over the lowercased query and table path.
pub type Stage = fn(&RuleTables, &str, &str, &mut Conditions);

/// Stages in application order.
pub const STAGES: [(&str, Stage); 4] = [
    ("pattern", apply_pattern_rules),
    ("capture", apply_capture_rules),
    ("context", apply_context_rules),
    ("numeric", apply_numeric_fallback),
];

/// Run every stage over `query` (any case) for `table`.
pub fn derive(tables: &RuleTables, query: &str, table: &str) -> Conditions {
    let lower = query.to_lowercase();
    let mut conditions = Conditions::new();
    for (name, stage) in STAGES {
        let before = conditions.len();
        stage(tables, &lower, table, &mut conditions);
        tracing::trace!(stage = name, added = conditions.len() - before, "condition stage");
    }
    conditions
}

fn apply_pattern_rules(tables: &RuleTables, lower: &str, table: &str, out: &mut Conditions) {
    for rule in &tables.pattern_rules {
        if !table_allows(&rule.required_keywords, table) {
            continue;
        }
        if rule
            .patterns
            .iter()
            .any(|p| !p.is_empty() && lower.contains(p.to_lowercase().as_str()))
        {
            out.insert(rule.field.as_str(), rule.value.as_str());
        }
    }
}

fn apply_capture_rules(tables: &RuleTables, lower: &str, table: &str, out: &mut Conditions) {
    for rule in &tables.capture_rules {
        if !table_allows(&rule.required_keywords, table) {
            continue;
        }
        if !rule
            .triggers
            .iter()
            .any(|t| !t.is_empty() && lower.contains(t.to_lowercase().as_str()))
        {
            continue;
        }
        if let Some(caps) = rule.regex.captures(lower)
            && let Some(value) = caps.get(1)
        {
            out.insert(rule.field.as_str(), value.as_str());
        }
    }
}

fn apply_context_rules(tables: &RuleTables, lower: &str, table: &str, out: &mut Conditions) {
    for rule in &tables.context_rules {
        if (rule.applies)(lower, table) {
            out.insert(rule.field, rule.value);
        }
    }
}

fn apply_numeric_fallback(tables: &RuleTables, lower: &str, _table: &str, out: &mut Conditions) {
    for caps in tables.numeric.captures_iter(lower) {
        let (Some(field), Some(op), Some(value)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            continue;
        };
        let op = match op.as_str() {
            "greater than" => ">",
            "less than" => "<",
            "equal to" => "=",
            other => other,
        };
        out.insert(field.as_str(), format!("{op} {}", value.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> RuleTables {
        RuleTables::builtin().unwrap()
    }

    const IFACE: &str = ".namespace.node.srl.interface";
    const BGP_NEIGHBOR: &str = ".namespace.node.srl.network-instance.protocols.bgp.neighbor";

    #[test]
    fn insert_overwrites_in_place() {
        let mut c = Conditions::new();
        c.insert("a", "1");
        c.insert("b", "2");
        c.insert("a", "3");
        let pairs: Vec<_> = c.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn render_quotes_plain_values_only() {
        assert_eq!(render_condition("oper-state", "up"), r#"oper-state = "up""#);
        assert_eq!(render_condition("mtu", "> 1500"), "mtu > 1500");
        assert_eq!(render_condition("aggregate-id", "!= null"), "aggregate-id != null");
        assert_eq!(
            render_condition("ethernet-pmd", "~ \"BASE-T\""),
            r#"ethernet-pmd ~ "BASE-T""#
        );
    }

    #[test]
    fn pattern_rules_are_gated_by_table_keywords() {
        let t = tables();
        let c = derive(&t, "interfaces that are down", IFACE);
        assert_eq!(c.get("oper-state"), Some("down"));

        let c = derive(&t, "interfaces that are down", ".namespace.node.srl.system.cpu");
        assert!(c.get("oper-state").is_none());
    }

    #[test]
    fn first_pattern_of_a_rule_wins_but_later_rules_overwrite() {
        // "active" matches oper-state=up, "inactive" then overwrites with down
        let c = derive(&tables(), "inactive interfaces", IFACE);
        assert_eq!(c.get("oper-state"), Some("down"));
    }

    #[test]
    fn capture_rules_extract_values() {
        let c = derive(&tables(), "subinterfaces in vlan id 200", ".namespace.node.srl.interface.subinterface.vlan");
        assert_eq!(c.get("vlan-id"), Some("200"));

        let c = derive(&tables(), "interfaces with mtu 9000", IFACE);
        assert_eq!(c.get("mtu"), Some("9000"));
    }

    #[test]
    fn context_rule_rewrites_bgp_down() {
        let c = derive(&tables(), "bgp neighbors that are down", BGP_NEIGHBOR);
        assert_eq!(c.get("session-state"), Some("!= \"established\""));

        let c = derive(&tables(), "bgp neighbors established", BGP_NEIGHBOR);
        assert_eq!(c.get("session-state"), Some("established"));
    }

    #[test]
    fn numeric_fallback_normalizes_operators() {
        let c = derive(&tables(), "processes with memory greater than 80", ".namespace.node.srl.system.process");
        assert_eq!(c.get("memory"), Some("> 80"));

        let c = derive(&tables(), "cpu >= 90", ".namespace.node.srl.system.cpu");
        assert_eq!(c.get("cpu"), Some(">= 90"));
    }

    #[test]
    fn nothing_matches_an_empty_query() {
        assert!(derive(&tables(), "", IFACE).is_empty());
    }

    #[test]
    fn stage_order_is_fixed() {
        let names: Vec<&str> = STAGES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["pattern", "capture", "context", "numeric"]);
    }
}
