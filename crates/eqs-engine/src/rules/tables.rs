//! Built-in extraction tables and configurable additions.
//!
//! All tables are compiled once. Configured additions are validated here so
//! a bad regex fails at startup instead of on some later query.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

// ── Rule types ────────────────────────────────────────────────

/// Literal trigger → fixed value for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub field: String,
    pub value: String,
    /// Substrings of the lowercased query; the first hit applies the rule.
    pub patterns: Vec<String>,
    /// The table path must contain all of these (case-insensitive).
    #[serde(default)]
    pub required_keywords: Vec<String>,
}

/// Trigger word plus a regex whose first capture group becomes the value.
#[derive(Debug, Clone)]
pub struct CaptureRule {
    pub field: String,
    pub triggers: Vec<String>,
    pub regex: Regex,
    pub required_keywords: Vec<String>,
}

/// Serialized form of a [`CaptureRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRuleConfig {
    pub field: String,
    pub triggers: Vec<String>,
    pub regex: String,
    #[serde(default)]
    pub required_keywords: Vec<String>,
}

/// A condition synthesized from `(query, table)` context.
#[derive(Debug, Clone, Copy)]
pub struct ContextRule {
    pub field: &'static str,
    pub value: &'static str,
    pub applies: fn(query: &str, table: &str) -> bool,
}

/// Extra rules appended after the built-in ones (`[[rules.pattern]]`,
/// `[[rules.capture]]` in the configuration file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverrides {
    #[serde(default)]
    pub pattern: Vec<PatternRule>,
    #[serde(default)]
    pub capture: Vec<CaptureRuleConfig>,
}

/// Whether `table` carries every required keyword. No keywords means any table.
pub(crate) fn table_allows(required: &[String], table: &str) -> bool {
    if required.is_empty() {
        return true;
    }
    let table = table.to_lowercase();
    required
        .iter()
        .all(|kw| table.contains(kw.to_lowercase().as_str()))
}

// ── Tables ────────────────────────────────────────────────────

/// Immutable tables driving clause extraction.
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub(crate) field_keywords: Vec<(String, Vec<String>)>,
    pub(crate) pattern_rules: Vec<PatternRule>,
    pub(crate) capture_rules: Vec<CaptureRule>,
    pub(crate) context_rules: Vec<ContextRule>,
    pub(crate) numeric: Regex,
    pub(crate) limit_patterns: Vec<Regex>,
    pub(crate) every_seconds: Regex,
    pub(crate) every_milliseconds: Regex,
    pub(crate) streaming: Regex,
}

impl RuleTables {
    pub fn builtin() -> EngineResult<Self> {
        Self::with_overrides(&RuleOverrides::default())
    }

    /// Built-in tables followed by `overrides`, all validated.
    pub fn with_overrides(overrides: &RuleOverrides) -> EngineResult<Self> {
        let mut pattern_rules = builtin_pattern_rules();
        for rule in &overrides.pattern {
            if rule.patterns.iter().all(|p| p.trim().is_empty()) {
                return Err(EngineError::EmptyRule(rule.field.clone()));
            }
            pattern_rules.push(rule.clone());
        }

        let mut capture_rules = Vec::new();
        for rule in builtin_capture_rules().iter().chain(&overrides.capture) {
            capture_rules.push(compile_capture(rule)?);
        }

        let limit_patterns = [r"top (\d+)", r"first (\d+)", r"limit (\d+)", r"(\d+) results"]
            .into_iter()
            .map(|p| compile("limit", p))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            field_keywords: builtin_field_keywords(),
            pattern_rules,
            capture_rules,
            context_rules: builtin_context_rules(),
            numeric: compile(
                "numeric",
                r"(\w+)\s*(greater than|less than|equal to|!=|>=|<=|>|<|=)\s*(\d+)",
            )?,
            limit_patterns,
            every_seconds: compile("delta", r"every (\d+) seconds?")?,
            every_milliseconds: compile("delta", r"every (\d+) milliseconds?")?,
            streaming: compile("delta", r"real[\s-]?time|streaming")?,
        })
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        &self.pattern_rules
    }

    pub fn capture_rules(&self) -> &[CaptureRule] {
        &self.capture_rules
    }
}

fn compile(field: &str, pattern: &str) -> EngineResult<Regex> {
    Regex::new(pattern).map_err(|source| EngineError::InvalidPattern {
        field: field.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_capture(rule: &CaptureRuleConfig) -> EngineResult<CaptureRule> {
    if rule.triggers.iter().all(|t| t.is_empty()) {
        return Err(EngineError::EmptyRule(rule.field.clone()));
    }
    let regex = compile(&rule.field, &rule.regex)?;
    if regex.captures_len() < 2 {
        return Err(EngineError::MissingCaptureGroup {
            field: rule.field.clone(),
            pattern: rule.regex.clone(),
        });
    }
    Ok(CaptureRule {
        field: rule.field.clone(),
        triggers: rule.triggers.clone(),
        regex,
        required_keywords: rule.required_keywords.clone(),
    })
}

// ── Built-in data ─────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pattern(field: &str, value: &str, patterns: &[&str], required: &[&str]) -> PatternRule {
    PatternRule {
        field: field.to_string(),
        value: value.to_string(),
        patterns: strings(patterns),
        required_keywords: strings(required),
    }
}

fn builtin_pattern_rules() -> Vec<PatternRule> {
    const IFACE: &[&str] = &["interface"];
    const ETH_IFACE: &[&str] = &["ethernet", "interface"];
    const XCVR: &[&str] = &["transceiver"];
    const BGP_NEIGHBOR: &[&str] = &["bgp", "neighbor"];

    vec![
        // interface state
        pattern("oper-state", "up", &["up", "operational", "active"], IFACE),
        pattern("oper-state", "down", &["down", "failed", "inactive"], IFACE),
        pattern("admin-state", "enable", &["enabled", "enable"], IFACE),
        pattern("admin-state", "disable", &["disabled", "disable"], IFACE),
        // port speed
        pattern("port-speed", "400G", &["400g", "400gbps", "400 gbps"], ETH_IFACE),
        pattern("port-speed", "100G", &["100g", "100gbps", "100 gbps"], ETH_IFACE),
        pattern("port-speed", "50G", &["50g", "50gbps", "50 gbps"], ETH_IFACE),
        pattern("port-speed", "40G", &["40g", "40gbps", "40 gbps"], ETH_IFACE),
        pattern("port-speed", "25G", &["25g", "25gbps", "25 gbps"], ETH_IFACE),
        pattern("port-speed", "10G", &["10g", "10gbps", "10 gbps"], ETH_IFACE),
        pattern("port-speed", "1G", &["1g", "1gbps", "1 gbps", "gigabit"], ETH_IFACE),
        // physical medium
        pattern("physical-medium", "fiber", &["fiber", "optical", "sfp", "qsfp"], ETH_IFACE),
        pattern("physical-medium", "copper", &["copper", "dac", "electrical"], ETH_IFACE),
        // ethernet pmd
        pattern("ethernet-pmd", "~ \"BASE-T\"", &["copper", "electrical"], &["transceiver", "ethernet"]),
        pattern("ethernet-pmd", "!~ \"BASE-T\"", &["fiber", "optical"], &["transceiver", "ethernet"]),
        // vlan tagging
        pattern("vlan-tagging", "true", &["vlan tagging enabled", "vlan-tagging", "tagged"], IFACE),
        pattern("vlan-tagging", "false", &["vlan tagging disabled", "no vlan", "untagged"], IFACE),
        // transceiver form factor, most specific first
        pattern("form-factor", "QSFP28", &["qsfp28"], XCVR),
        pattern("form-factor", "QSFP+", &["qsfp+"], XCVR),
        pattern("form-factor", "QSFP", &["qsfp"], XCVR),
        pattern("form-factor", "SFP+", &["sfp+"], XCVR),
        pattern("form-factor", "SFP", &["sfp"], XCVR),
        pattern("form-factor", "CFP", &["cfp"], XCVR),
        pattern("form-factor", "XFP", &["xfp"], XCVR),
        // lag
        pattern("aggregate-id", "!= null", &["lag members", "lag member"], &["ethernet"]),
        pattern("lacp-mode", "active", &["lacp"], &["lag"]),
        pattern("lag-type", "static", &["static lag"], &["lag"]),
        pattern("lag-type", "lacp", &["dynamic lag"], &["lag"]),
        // bgp session state
        pattern("session-state", "established", &["established"], BGP_NEIGHBOR),
        pattern("session-state", "idle", &["idle"], BGP_NEIGHBOR),
        pattern("session-state", "active", &["active"], BGP_NEIGHBOR),
        pattern("session-state", "connect", &["connect"], BGP_NEIGHBOR),
        pattern("session-state", "opensent", &["opensent"], BGP_NEIGHBOR),
        pattern("session-state", "openconfirm", &["openconfirm"], BGP_NEIGHBOR),
        // bgp peer type
        pattern("peer-type", "external", &["ebgp", "external"], BGP_NEIGHBOR),
        pattern("peer-type", "internal", &["ibgp", "internal"], BGP_NEIGHBOR),
        // connector
        pattern("connector-type", "LC", &["lc connector", "lc"], XCVR),
        pattern("connector-type", "MPO", &["mpo", "mtp"], XCVR),
    ]
}

fn builtin_capture_rules() -> Vec<CaptureRuleConfig> {
    let rule = |field: &str, triggers: &[&str], regex: &str, required: &[&str]| CaptureRuleConfig {
        field: field.to_string(),
        triggers: strings(triggers),
        regex: regex.to_string(),
        required_keywords: strings(required),
    };
    vec![
        rule("vlan-id", &["vlan"], r"vlan\s+(?:id\s+)?(\d+)", &["vlan"]),
        rule("aggregate-id", &["lag"], r"lag\s*(\d+)", &["ethernet"]),
        rule("peer-as", &["as ", "as number"], r"as\s+(?:number\s+)?(\d+)", &["bgp"]),
        rule("mtu", &["mtu"], r"mtu\s+(\d+)", &["interface"]),
    ]
}

fn builtin_context_rules() -> Vec<ContextRule> {
    vec![ContextRule {
        field: "session-state",
        value: "!= \"established\"",
        applies: |query, table| {
            query.contains("down")
                && table.contains("bgp")
                && table.contains("neighbor")
                && !query.contains("established")
        },
    }]
}

fn builtin_field_keywords() -> Vec<(String, Vec<String>)> {
    let table: &[(&str, &[&str])] = &[
        ("state", &["admin-state", "oper-state", "state"]),
        ("status", &["status", "oper-state", "admin-state"]),
        ("description", &["description"]),
        ("name", &["name"]),
        ("memory", &["memory", "memory-usage", "used"]),
        ("cpu", &["cpu", "cpu-usage"]),
        ("traffic", &["in-octets", "out-octets"]),
        ("bandwidth", &["in-octets", "out-octets"]),
        ("packets", &["in-packets", "out-packets"]),
        ("errors", &["in-error-packets", "out-error-packets", "in-errors", "out-errors"]),
        ("severity", &["severity"]),
        ("time", &["time-created", "last-change", "last-clear"]),
        ("octets", &["in-octets", "out-octets"]),
        ("mtu", &["mtu", "ip-mtu", "oper-ip-mtu"]),
        ("drops", &["in-drops", "out-drops", "in-discards", "out-discards"]),
        ("speed", &["port-speed", "lag-speed", "member-speed"]),
        ("vlan", &["vlan-tagging", "vlan-id", "tpid"]),
        ("lag", &["aggregate-id", "lag-type", "lacp-mode"]),
        ("optical", &["form-factor", "connector-type", "wavelength"]),
        ("transceiver", &["form-factor", "vendor", "serial-number"]),
        ("fiber", &["physical-medium", "connector-type", "wavelength"]),
        ("copper", &["physical-medium", "ethernet-pmd"]),
        ("sfp", &["form-factor", "vendor-part-number"]),
        ("mac", &["hw-mac-address", "system-id-mac"]),
        ("power", &["input-power", "output-power", "laser-bias-current"]),
        ("vendor", &["vendor", "vendor-part-number", "vendor-serial-number"]),
        ("aggregate", &["aggregate-id", "lag-type", "min-links"]),
        ("lacp", &["lacp-mode", "lacp-port-priority", "interval"]),
        ("tagged", &["vlan-tagging", "vlan-id"]),
        ("physical", &["physical-medium", "linecard", "forwarding-complex"]),
        ("hardware", &["hw-mac-address", "form-factor", "vendor"]),
    ];
    table
        .iter()
        .map(|(keyword, fragments)| ((*keyword).to_string(), strings(fragments)))
        .collect()
}
