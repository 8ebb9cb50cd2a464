//! Release download: platform → local catalog file, fetching and unpacking
//! the release archive when the file is missing.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eqs_protocol::Platform;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

pub const SRL_RELEASE_URL: &str = "https://github.com/nokia-eda/llm-embeddings/releases/download/nokia-srl-25.3.3/llm-embeddings-srl-25-3-3.tar.gz";
pub const SRL_CATALOG_FILE: &str = "ce-llm-embed-db-srl-25.3.3.json";
pub const SROS_RELEASE_URL: &str = "https://github.com/nokia-eda/llm-embeddings/releases/download/nokia-sros-v25.3.r2/llm-embeddings-sros-25-3-r2.tar.gz";
pub const SROS_CATALOG_FILE: &str = "ce-llm-embed-db-sros-25.3.r1.json";

/// Release locations and the local catalog directory (`[catalog]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding extracted catalogs and their snapshots.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_srl_url")]
    pub srl_url: String,
    #[serde(default = "default_srl_file")]
    pub srl_file: String,
    #[serde(default = "default_sros_url")]
    pub sros_url: String,
    #[serde(default = "default_sros_file")]
    pub sros_file: String,
    /// Download timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_dir() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".eda").join("vscode").join("embeddings")
}

fn default_srl_url() -> String {
    SRL_RELEASE_URL.into()
}

fn default_srl_file() -> String {
    SRL_CATALOG_FILE.into()
}

fn default_sros_url() -> String {
    SROS_RELEASE_URL.into()
}

fn default_sros_file() -> String {
    SROS_CATALOG_FILE.into()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            srl_url: default_srl_url(),
            srl_file: default_srl_file(),
            sros_url: default_sros_url(),
            sros_file: default_sros_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Archive URL and the catalog file it must contain.
    pub fn release(&self, platform: Platform) -> (&str, &str) {
        match platform {
            Platform::Srl => (self.srl_url.as_str(), self.srl_file.as_str()),
            Platform::Sros => (self.sros_url.as_str(), self.sros_file.as_str()),
        }
    }

    pub fn path_for(&self, platform: Platform) -> PathBuf {
        self.dir.join(self.release(platform).1)
    }
}

/// Resolves platform catalogs to local files, downloading on first use.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl CatalogFetcher {
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Download {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn path_for(&self, platform: Platform) -> PathBuf {
        self.config.path_for(platform)
    }

    /// Local path of the platform catalog, downloading it if absent.
    pub async fn ensure(&self, platform: Platform) -> CatalogResult<PathBuf> {
        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| CatalogError::io(&self.config.dir, e))?;

        let path = self.path_for(platform);
        if tokio::fs::metadata(&path).await.is_ok() {
            tracing::debug!(%platform, path = %path.display(), "catalog present");
            return Ok(path);
        }

        self.download(platform).await?;
        Ok(path)
    }

    async fn download(&self, platform: Platform) -> CatalogResult<()> {
        let (url, file) = self.config.release(platform);
        tracing::info!(%platform, url, "downloading catalog release");

        let download_err = |e: reqwest::Error| CatalogError::Download {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().await.map_err(download_err)?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(download_err)?;

        let dir = self.config.dir.clone();
        let size = bytes.len();
        let unpacked =
            tokio::task::spawn_blocking(move || unpack_archive(&bytes, &dir)).await??;
        tracing::info!(%platform, bytes = size, entries = unpacked, "release archive extracted");

        let expected = self.config.dir.join(file);
        if tokio::fs::metadata(&expected).await.is_err() {
            return Err(CatalogError::MissingAfterExtract(
                expected.display().to_string(),
            ));
        }
        Ok(())
    }
}

/// Unpack a gzip-compressed tar archive into `dir`, returning the number of
/// entries written. Entries that would land outside `dir` are skipped.
pub fn unpack_archive(bytes: &[u8], dir: &Path) -> CatalogResult<usize> {
    let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
    let entries = archive
        .entries()
        .map_err(|e| CatalogError::Extract(e.to_string()))?;

    let mut unpacked = 0;
    for entry in entries {
        let mut entry = entry.map_err(|e| CatalogError::Extract(e.to_string()))?;
        let written = entry
            .unpack_in(dir)
            .map_err(|e| CatalogError::Extract(e.to_string()))?;
        if written {
            unpacked += 1;
        } else {
            tracing::warn!(path = ?entry.path().ok(), "skipped archive entry outside target directory");
        }
    }
    Ok(unpacked)
}
