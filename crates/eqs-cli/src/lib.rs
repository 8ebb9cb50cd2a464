//! `eqs` library crate: argument model, configuration, rendering and the
//! command flow, exposed so `eqs-e2e-tests` can drive it without a process.

pub mod cli;
pub mod config;
pub mod output;

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use eqs_catalog::{CachedCatalogLoader, CatalogConfig, CatalogFetcher, CatalogSource};
use eqs_engine::{EngineSettings, SearchEngine};
use eqs_protocol::{Platform, SearchResult};

pub use cli::Cli;
pub use config::CliConfig;

const USAGE: &str = "usage: eqs [--json] [--platform srl|sros] <query>

Examples:
  eqs 'show interface statistics for leaf1'
  eqs 'get top 5 processes by memory usage'
  eqs 'critical alarms from the last hour'
  eqs 'interface traffic on spine1 every 5 seconds'
  eqs --json 'show interfaces'";

/// How a search run renders its results.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub json: bool,
    pub explain: bool,
    pub full: bool,
}

impl From<&Cli> for RenderOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            explain: cli.explain,
            full: cli.full,
        }
    }
}

/// Run one invocation, writing user-facing output to `out`.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;

    if cli.wants_setup() {
        let loader = CachedCatalogLoader::new();
        return setup(&config.catalog, &loader, out).await;
    }

    let query = cli.query_text();
    if query.trim().is_empty() {
        writeln!(out, "{USAGE}")?;
        return Ok(());
    }

    let platform = cli.platform_for(&query);
    let path = match &cli.db {
        Some(path) => path.clone(),
        None => CatalogFetcher::new(config.catalog.clone())?
            .ensure(platform)
            .await
            .context("failed to fetch catalog")?,
    };
    tracing::info!(%platform, path = %path.display(), "searching catalog");

    let loader = CachedCatalogLoader::new();
    search_and_render(
        &loader,
        &path,
        &query,
        &config.engine,
        RenderOptions::from(cli),
        out,
    )
    .await
}

/// Load the catalog at `path`, search it, and render the results.
pub async fn search_and_render<W: Write>(
    source: &dyn CatalogSource,
    path: &Path,
    query: &str,
    settings: &EngineSettings,
    options: RenderOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let results = search(source, path, query, settings, options.full).await?;

    let rendered = if options.json {
        output::render_json(&results)?
    } else {
        output::render_text(&results, options.explain)
    };
    writeln!(out, "{rendered}")?;
    Ok(())
}

/// Load the catalog at `path` and run one query against it.
pub async fn search(
    source: &dyn CatalogSource,
    path: &Path,
    query: &str,
    settings: &EngineSettings,
    full: bool,
) -> anyhow::Result<Vec<SearchResult>> {
    let catalog = source
        .load(path)
        .await
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    let engine = SearchEngine::new(catalog, settings)?;

    let results = if full {
        engine.search_full(query)
    } else {
        engine.search(query)
    };
    tracing::info!(query, results = results.len(), full, "search complete");
    Ok(results)
}

/// Fetch every platform catalog and warm its caches.
pub async fn setup<W: Write>(
    config: &CatalogConfig,
    source: &dyn CatalogSource,
    out: &mut W,
) -> anyhow::Result<()> {
    let fetcher = CatalogFetcher::new(config.clone())?;

    for platform in Platform::ALL {
        let name = platform.as_str().to_uppercase();

        writeln!(out, "Downloading catalog for {name}...")?;
        let path = fetcher
            .ensure(platform)
            .await
            .with_context(|| format!("setup failed for {name}"))?;
        writeln!(out, "Downloaded to {}", path.display())?;

        writeln!(out, "Loading catalog for {name} into cache...")?;
        let catalog = source
            .load(&path)
            .await
            .with_context(|| format!("setup failed for {name}"))?;
        writeln!(out, "Loaded {} entries for {name}", catalog.len())?;
    }

    writeln!(out, "setup completed")?;
    Ok(())
}
