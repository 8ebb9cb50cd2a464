//! E2E tests for catalog acquisition and caching:
//! release download → extraction → JSON load → snapshot → memory.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use clap::Parser;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eqs_catalog::cache::snapshot_path;
use eqs_catalog::fetch::{SRL_CATALOG_FILE, SROS_CATALOG_FILE};
use eqs_catalog::mock::{sample_srl_catalog, sample_sros_catalog};
use eqs_catalog::{CachedCatalogLoader, CatalogFetcher, LoadTier};
use eqs_cli::Cli;
use eqs_engine::SearchEngine;
use eqs_protocol::{CatalogEntry, Platform};

use helpers::{TestHarness, catalog_json, keys, release_archive};

/// First load parses JSON, a second load hits memory, a fresh loader hits the snapshot.
#[tokio::test]
async fn e2e_load_tiers_progress_and_agree() {
    let h = TestHarness::with_samples();
    let json = h.write_catalog_json("srl.json", &sample_srl_catalog());
    let loader = CachedCatalogLoader::new();

    let (from_json, tier) = loader.load_with_tier(&json).await.unwrap();
    assert_eq!(tier, LoadTier::Json);
    assert!(from_json.is_indexed());
    assert!(snapshot_path(&json).exists(), "snapshot should be written");

    let (from_memory, tier) = loader.load_with_tier(&json).await.unwrap();
    assert_eq!(tier, LoadTier::Memory);
    assert!(Arc::ptr_eq(&from_json, &from_memory));

    let (from_snapshot, tier) = CachedCatalogLoader::new()
        .load_with_tier(&json)
        .await
        .unwrap();
    assert_eq!(tier, LoadTier::Snapshot);
    assert_eq!(from_snapshot.table, from_json.table);
    assert_eq!(from_snapshot.inverted_index, from_json.inverted_index);

    // identical catalogs rank identically
    let query = "show interface statistics for leaf1";
    let a = SearchEngine::with_defaults(from_json).unwrap().search(query);
    let b = SearchEngine::with_defaults(from_snapshot).unwrap().search(query);
    assert_eq!(keys(&a), keys(&b));
    assert_eq!(a, b);
}

/// A JSON file newer than its snapshot is reloaded from JSON.
#[tokio::test]
async fn e2e_stale_snapshot_is_rebuilt() {
    let h = TestHarness::with_samples();
    let json = h.write_catalog_json("srl.json", &sample_srl_catalog());
    CachedCatalogLoader::new().load_with_tier(&json).await.unwrap();

    let mut grown = sample_srl_catalog();
    grown.table.insert(
        ".namespace.node.srl.system.ntp.server".to_string(),
        CatalogEntry::with_info("time servers", "NTP servers", &["address", "stratum"]),
    );
    std::fs::write(&json, catalog_json(&grown)).unwrap();
    std::fs::File::options()
        .write(true)
        .open(&json)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let (catalog, tier) = CachedCatalogLoader::new()
        .load_with_tier(&json)
        .await
        .unwrap();
    assert_eq!(tier, LoadTier::Json);
    assert_eq!(catalog.len(), grown.len());
    assert!(!catalog.postings("ntp").is_empty());
}

/// An unreadable snapshot never fails the load.
#[tokio::test]
async fn e2e_corrupt_snapshot_falls_back_to_json() {
    let h = TestHarness::with_samples();
    let json = h.write_catalog_json("srl.json", &sample_srl_catalog());
    std::fs::write(snapshot_path(&json), b"not a snapshot").unwrap();

    let (catalog, tier) = CachedCatalogLoader::new()
        .load_with_tier(&json)
        .await
        .unwrap();
    assert_eq!(tier, LoadTier::Json);
    assert_eq!(catalog.len(), sample_srl_catalog().len());
}

/// Setup downloads both releases once, extracts them and warms the caches.
#[tokio::test]
async fn e2e_setup_downloads_and_caches_both_platforms() {
    let h = TestHarness::with_samples();
    let server = MockServer::start().await;

    let srl = release_archive(&[(SRL_CATALOG_FILE, &catalog_json(&sample_srl_catalog())[..])]);
    let sros = release_archive(&[(SROS_CATALOG_FILE, &catalog_json(&sample_sros_catalog())[..])]);
    Mock::given(method("GET"))
        .and(path("/srl.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(srl))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sros.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(sros))
        .expect(1)
        .mount(&server)
        .await;

    let config = h.catalog_config(&server.uri());
    let loader = CachedCatalogLoader::new();
    let mut out = Vec::new();
    eqs_cli::setup(&config, &loader, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Downloading catalog for SRL..."));
    assert!(out.contains("Loaded 15 entries for SRL"));
    assert!(out.contains("Loaded 6 entries for SROS"));
    assert!(out.trim_end().ends_with("setup completed"));

    for platform in Platform::ALL {
        let json = config.path_for(platform);
        assert!(json.exists(), "{platform} catalog should be extracted");
        assert!(snapshot_path(&json).exists(), "{platform} snapshot should be written");
    }
    assert_eq!(loader.memory().len().await, 2);

    // already present: no second download
    let fetcher = CatalogFetcher::new(config.clone()).unwrap();
    assert_eq!(
        fetcher.ensure(Platform::Srl).await.unwrap(),
        config.path_for(Platform::Srl)
    );
}

/// A failing release download surfaces as a setup error naming the platform.
#[tokio::test]
async fn e2e_setup_reports_download_failure() {
    let h = TestHarness::with_samples();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = h.catalog_config(&server.uri());
    let mut out = Vec::new();
    let err = eqs_cli::setup(&config, &CachedCatalogLoader::new(), &mut out)
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("setup failed for SRL"), "{message}");
    assert!(message.contains("404"), "{message}");
}

/// An archive without the expected catalog file is rejected.
#[tokio::test]
async fn e2e_release_without_catalog_is_rejected() {
    let h = TestHarness::with_samples();
    let server = MockServer::start().await;
    let archive = release_archive(&[("README.md", &b"nothing here"[..])]);
    Mock::given(method("GET"))
        .and(path("/srl.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;

    let fetcher = CatalogFetcher::new(h.catalog_config(&server.uri())).unwrap();
    let err = fetcher.ensure(Platform::Srl).await.unwrap_err();
    assert!(err.to_string().contains(SRL_CATALOG_FILE), "{err}");
}

/// The binary flow with `--db` searches a local JSON catalog and prints JSON.
#[tokio::test]
async fn e2e_run_with_local_db() {
    let h = TestHarness::with_samples();
    let json = h.write_catalog_json("srl.json", &sample_srl_catalog());
    let config = h.dir.path().join("eqs.toml");
    std::fs::write(&config, "[search]\nmax_results = 4\n").unwrap();

    let cli = Cli::parse_from([
        "eqs",
        "--config",
        config.to_str().unwrap(),
        "--db",
        json.to_str().unwrap(),
        "--json",
        "show",
        "interface",
        "statistics",
    ]);
    let mut out = Vec::new();
    eqs_cli::run(&cli, &mut out).await.unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value["topMatch"]["table"],
        ".namespace.node.srl.interface.statistics"
    );
    let others = value["others"].as_array().map_or(0, Vec::len);
    assert!(others <= 3, "max_results from config caps the output");
    assert!(snapshot_path(&json).exists());
}
