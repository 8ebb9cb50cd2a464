//! CLI configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use eqs_catalog::CatalogConfig;
use eqs_engine::EngineSettings;
use serde::Deserialize;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "EQS_CONFIG";

/// Top-level configuration for the `eqs` binary.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Release locations and catalog directory.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// `[scoring]`, `[search]` and `[rules]`.
    #[serde(flatten)]
    pub engine: EngineSettings,
}

impl CliConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `explicit`, else from `$EQS_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match path {
            Some(path) => {
                let config = Self::from_file(&path)?;
                tracing::debug!(path = %path.display(), "config loaded");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
