//! Mock catalog source for testing: serves pre-built sample catalogs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eqs_engine::{Tokenizer, build_inverted_index};
use eqs_protocol::{Catalog, CatalogEntry, Platform};

use crate::error::{CatalogError, CatalogResult};
use crate::source::CatalogSource;

pub const SRL_SAMPLE_PATH: &str = "/mock/ce-llm-embed-db-srl.json";
pub const SROS_SAMPLE_PATH: &str = "/mock/ce-llm-embed-db-sros.json";

/// A catalog source that serves in-memory catalogs by path.
#[derive(Debug, Default)]
pub struct MockCatalogSource {
    catalogs: HashMap<PathBuf, Arc<Catalog>>,
    loads: AtomicUsize,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `catalog` under `path`, building its index if missing.
    pub fn add(&mut self, path: impl Into<PathBuf>, mut catalog: Catalog) {
        build_inverted_index(&mut catalog, &Tokenizer::new());
        self.catalogs.insert(path.into(), Arc::new(catalog));
    }

    /// Both sample catalogs, at [`SRL_SAMPLE_PATH`] and [`SROS_SAMPLE_PATH`].
    pub fn with_samples() -> Self {
        let mut m = Self::new();
        m.add(SRL_SAMPLE_PATH, sample_srl_catalog());
        m.add(SROS_SAMPLE_PATH, sample_sros_catalog());
        m
    }

    pub fn sample_path(platform: Platform) -> &'static Path {
        match platform {
            Platform::Srl => Path::new(SRL_SAMPLE_PATH),
            Platform::Sros => Path::new(SROS_SAMPLE_PATH),
        }
    }

    /// Number of `load` calls served so far, including failed ones.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn load(&self, path: &Path) -> CatalogResult<Arc<Catalog>> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.catalogs
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(path.display().to_string()))
    }
}

/// Key, reference text, description, fields.
type Sample<'a> = (&'a str, &'a str, &'a str, &'a [&'a str]);

fn build(entries: &[Sample]) -> Catalog {
    entries
        .iter()
        .map(|(key, reference, description, fields)| {
            (
                (*key).to_string(),
                CatalogEntry::with_info(*reference, description, fields),
            )
        })
        .collect()
}

/// A small SR Linux catalog with the tables most queries land on.
pub fn sample_srl_catalog() -> Catalog {
    let entries: &[Sample] = &[
        (
            ".namespace.node.srl.interface",
            "network interfaces ports",
            "List of all interfaces on the node",
            &["name", "description", "admin-state", "oper-state", "mtu", "last-change"],
        ),
        (
            ".namespace.node.srl.interface.statistics",
            "interface counters traffic",
            "Interface traffic statistics and error counters",
            &[
                "in-octets",
                "out-octets",
                "in-packets",
                "out-packets",
                "in-error-packets",
                "out-error-packets",
                "in-discarded-packets",
            ],
        ),
        (
            ".namespace.node.srl.interface.subinterface",
            "logical subinterfaces",
            "Subinterfaces configured under an interface",
            &["index", "description", "admin-state", "oper-state", "vlan-id"],
        ),
        (
            ".namespace.node.srl.interface.ethernet",
            "ethernet port settings",
            "Ethernet configuration and state of a port",
            &["port-speed", "physical-medium", "aggregate-id", "hw-mac-address"],
        ),
        (
            ".namespace.node.srl.interface.transceiver",
            "optical transceiver",
            "Transceiver inventory and optics",
            &["form-factor", "connector-type", "vendor", "serial-number", "ethernet-pmd"],
        ),
        (
            ".namespace.node.srl.interface.lag",
            "link aggregation",
            "LAG settings of an interface",
            &["lag-type", "lacp-mode", "min-links", "lag-speed"],
        ),
        (
            ".namespace.node.srl.network-instance.protocols.bgp.neighbor",
            "bgp peers sessions",
            "BGP neighbor session state",
            &["peer-address", "peer-as", "peer-type", "session-state", "last-established"],
        ),
        (
            ".namespace.node.srl.network-instance.protocols.bgp.group",
            "bgp peer groups",
            "BGP peer groups",
            &["group-name", "admin-state", "peer-as"],
        ),
        (
            ".namespace.node.srl.network-instance.route-table.ipv4-unicast.route",
            "ipv4 routing table",
            "IPv4 unicast routes",
            &["ipv4-prefix", "route-type", "metric", "preference", "active"],
        ),
        (
            ".namespace.node.srl.system.app-management.application",
            "processes applications",
            "Running applications and processes",
            &["name", "pid", "state", "memory-usage", "memory-utilization", "cpu-utilization"],
        ),
        (
            ".namespace.node.srl.platform.control.cpu",
            "control plane cpu",
            "CPU usage of the control module",
            &["index", "total", "cpu-usage"],
        ),
        (
            ".namespace.node.srl.platform.control.memory",
            "control plane memory",
            "Memory usage of the control module",
            &["physical", "used", "free", "memory-usage"],
        ),
        (
            ".namespace.node.srl.platform.fan-tray",
            "fans cooling",
            "Fan tray status",
            &["id", "oper-state", "speed"],
        ),
        (
            ".namespace.node.srl.system.lldp.interface.neighbor",
            "lldp neighbors",
            "LLDP neighbors discovered on each interface",
            &["chassis-id", "system-name", "port-id"],
        ),
        (
            ".namespace.node.srl.system.maintenance.group",
            "maintenance mode",
            "Maintenance groups and their members",
            &["name", "maintenance-mode", "members"],
        ),
    ];
    build(entries)
}

/// A small SR OS catalog.
pub fn sample_sros_catalog() -> Catalog {
    let entries: &[Sample] = &[
        (
            ".namespace.node.sros.state.router.interface",
            "router interfaces",
            "IP interfaces of a router instance",
            &["interface-name", "oper-state", "if-index", "oper-ip-mtu"],
        ),
        (
            ".namespace.node.sros.state.router.interface.statistics",
            "router interface counters",
            "IP interface statistics",
            &["in-octets", "out-octets", "in-packets", "out-packets"],
        ),
        (
            ".namespace.node.sros.state.port",
            "physical ports",
            "Port state",
            &["port-id", "oper-state", "down-reason"],
        ),
        (
            ".namespace.node.sros.state.port.ethernet.statistics",
            "port ethernet counters",
            "Ethernet port statistics",
            &["in-octets", "out-octets", "in-errors", "out-errors", "in-discards"],
        ),
        (
            ".namespace.node.sros.state.router.bgp.neighbor",
            "bgp peers",
            "BGP neighbor state",
            &["ip-address", "peer-as", "session-state"],
        ),
        (
            ".namespace.node.sros.state.system.cpu",
            "system cpu",
            "CPU usage summary",
            &["sample-period", "summary"],
        ),
    ];
    build(entries)
}
