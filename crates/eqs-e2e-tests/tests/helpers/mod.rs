//! Shared test harness for E2E integration tests.
//!
//! Serves the sample catalogs through `MockCatalogSource` and drives the
//! same `eqs_cli` entry points the binary uses, so every search crosses the
//! protocol, engine, catalog and CLI crates.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use eqs_catalog::{CatalogConfig, MockCatalogSource};
use eqs_cli::RenderOptions;
use eqs_engine::EngineSettings;
use eqs_protocol::{Catalog, Platform, SearchResult};

/// End-to-end harness: sample catalogs, engine settings and a scratch dir.
pub struct TestHarness {
    /// In-memory SRL and SROS sample catalogs.
    pub source: MockCatalogSource,
    /// Settings every search runs with.
    pub settings: EngineSettings,
    /// Scratch directory for catalog files and snapshots.
    pub dir: TempDir,
}

impl TestHarness {
    /// Harness over both sample catalogs with default settings.
    pub fn with_samples() -> Self {
        Self {
            source: MockCatalogSource::with_samples(),
            settings: EngineSettings::default(),
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Indexed search against the sample catalog for `platform`.
    pub async fn search(&self, platform: Platform, query: &str) -> Vec<SearchResult> {
        self.run_search(platform, query, false).await
    }

    /// Exhaustive search against the sample catalog for `platform`.
    pub async fn search_full(&self, platform: Platform, query: &str) -> Vec<SearchResult> {
        self.run_search(platform, query, true).await
    }

    async fn run_search(&self, platform: Platform, query: &str, full: bool) -> Vec<SearchResult> {
        eqs_cli::search(
            &self.source,
            MockCatalogSource::sample_path(platform),
            query,
            &self.settings,
            full,
        )
        .await
        .unwrap()
    }

    /// Render a search the way the binary prints it.
    pub async fn render(&self, platform: Platform, query: &str, options: RenderOptions) -> String {
        let mut out = Vec::new();
        eqs_cli::search_and_render(
            &self.source,
            MockCatalogSource::sample_path(platform),
            query,
            &self.settings,
            options,
            &mut out,
        )
        .await
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Catalog config rooted at the scratch dir, with both releases served
    /// by `base_url`.
    pub fn catalog_config(&self, base_url: &str) -> CatalogConfig {
        CatalogConfig {
            dir: self.dir.path().join("catalogs"),
            srl_url: format!("{base_url}/srl.tar.gz"),
            sros_url: format!("{base_url}/sros.tar.gz"),
            timeout_secs: 10,
            ..CatalogConfig::default()
        }
    }

    /// Write `catalog` as release-style JSON under the scratch dir.
    ///
    /// The file is back-dated an hour so a snapshot written afterwards is
    /// strictly newer.
    pub fn write_catalog_json(&self, name: &str, catalog: &Catalog) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, catalog_json(catalog)).unwrap();
        backdate(&path);
        path
    }
}

/// Raw release JSON: the table only, no inverted index.
pub fn catalog_json(catalog: &Catalog) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "Table": catalog.table })).unwrap()
}

/// Set the modification time of `path` one hour into the past.
pub fn backdate(path: &Path) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
}

/// A gzip-compressed tarball holding `files`.
pub fn release_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap()
}

/// Keys of `results`, in rank order.
pub fn keys(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.key.as_str()).collect()
}
