//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use eqs_protocol::Platform;

/// Translate a natural-language question into an EQL query against the
/// EDA state-table catalog.
///
/// Run `eqs setup` (or `eqs --setup`) once to download both platform
/// catalogs and build their caches.
#[derive(Debug, Parser)]
#[command(name = "eqs", version, about)]
pub struct Cli {
    /// Query words; joined with single spaces.
    pub query: Vec<String>,

    /// Catalog JSON file to search instead of the downloaded release.
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Force the platform (`srl` or `sros`) instead of detecting it from the query.
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Configuration file (TOML). Falls back to `$EQS_CONFIG`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Score every catalog entry instead of only index candidates.
    #[arg(long)]
    pub full: bool,

    /// Show why each result matched.
    #[arg(long)]
    pub explain: bool,

    /// Download all catalogs and build their caches.
    #[arg(long)]
    pub setup: bool,

    /// Emit logs as JSON on stderr.
    #[arg(long)]
    pub log_json: bool,

    /// Log at info level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `--setup`, or `setup` as the first word.
    pub fn wants_setup(&self) -> bool {
        self.setup || self.query.first().is_some_and(|w| w == "setup")
    }

    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    /// Explicit `--platform`, else detected from the query vocabulary.
    pub fn platform_for(&self, query: &str) -> Platform {
        self.platform
            .unwrap_or_else(|| Platform::detect_from_query(query))
    }
}
