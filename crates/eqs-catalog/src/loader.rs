//! Three-tier catalog loading: memory, binary snapshot, then JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use eqs_engine::{Tokenizer, build_inverted_index};
use eqs_protocol::Catalog;

use crate::cache::{self, MemoryCache};
use crate::error::{CatalogError, CatalogResult};
use crate::source::CatalogSource;

/// Where a catalog came from on its most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTier {
    Memory,
    Snapshot,
    Json,
}

/// Loads catalogs from JSON files, caching them in memory and as snapshots.
///
/// A JSON load builds the inverted index and writes the snapshot back.
/// Snapshot failures never fail the load: an unreadable snapshot falls
/// back to JSON and a failed write is only logged.
#[derive(Debug)]
pub struct CachedCatalogLoader {
    memory: MemoryCache,
    tokenizer: Arc<Tokenizer>,
    write_snapshots: bool,
}

impl CachedCatalogLoader {
    pub fn new() -> Self {
        Self {
            memory: MemoryCache::new(),
            tokenizer: Arc::new(Tokenizer::new()),
            write_snapshots: true,
        }
    }

    /// Skip writing snapshots after JSON loads.
    pub fn without_snapshot_writes(mut self) -> Self {
        self.write_snapshots = false;
        self
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    /// Load `path`, reporting which tier served it.
    pub async fn load_with_tier(&self, path: &Path) -> CatalogResult<(Arc<Catalog>, LoadTier)> {
        if let Some(catalog) = self.memory.get(path).await {
            tracing::debug!(path = %path.display(), "catalog served from memory");
            return Ok((catalog, LoadTier::Memory));
        }

        let snapshot = cache::snapshot_path(path);
        if cache::snapshot_is_fresh(path, &snapshot).await
            && let Some(catalog) = self.load_snapshot(snapshot.clone()).await
        {
            let catalog = Arc::new(catalog);
            self.memory.insert(path, Arc::clone(&catalog)).await;
            return Ok((catalog, LoadTier::Snapshot));
        }

        let catalog = Arc::new(self.load_json(path).await?);
        if self.write_snapshots {
            self.save_snapshot(snapshot, Arc::clone(&catalog)).await;
        }
        self.memory.insert(path, Arc::clone(&catalog)).await;
        Ok((catalog, LoadTier::Json))
    }

    async fn load_snapshot(&self, snapshot: PathBuf) -> Option<Catalog> {
        let start = Instant::now();
        let path_str = snapshot.display().to_string();
        match tokio::task::spawn_blocking(move || cache::read_snapshot(&snapshot)).await {
            Ok(Ok((header, catalog))) => {
                tracing::info!(
                    path = %path_str,
                    entries = catalog.len(),
                    built_at = %header.built_at,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "catalog loaded from snapshot"
                );
                Some(catalog)
            }
            Ok(Err(e)) => {
                tracing::warn!(path = %path_str, error = %e, "snapshot unreadable; falling back to JSON");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path_str, error = %e, "snapshot task failed; falling back to JSON");
                None
            }
        }
    }

    async fn load_json(&self, path: &Path) -> CatalogResult<Catalog> {
        let start = Instant::now();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CatalogError::io(path, e))?;

        let tokenizer = Arc::clone(&self.tokenizer);
        let path_str = path.display().to_string();
        let catalog = tokio::task::spawn_blocking(move || -> CatalogResult<Catalog> {
            let mut catalog: Catalog =
                serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode {
                    path: path_str,
                    message: e.to_string(),
                })?;
            build_inverted_index(&mut catalog, &tokenizer);
            Ok(catalog)
        })
        .await??;

        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            terms = catalog.inverted_index.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog loaded from JSON"
        );
        Ok(catalog)
    }

    async fn save_snapshot(&self, snapshot: PathBuf, catalog: Arc<Catalog>) {
        let path_str = snapshot.display().to_string();
        let result =
            tokio::task::spawn_blocking(move || cache::write_snapshot(&snapshot, &catalog)).await;
        match result {
            Ok(Ok(())) => tracing::debug!(path = %path_str, "snapshot written"),
            Ok(Err(e)) => tracing::warn!(path = %path_str, error = %e, "failed to write snapshot"),
            Err(e) => tracing::warn!(path = %path_str, error = %e, "snapshot task failed"),
        }
    }
}

impl Default for CachedCatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for CachedCatalogLoader {
    async fn load(&self, path: &Path) -> CatalogResult<Arc<Catalog>> {
        self.load_with_tier(path).await.map(|(catalog, _)| catalog)
    }
}
