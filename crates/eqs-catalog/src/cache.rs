//! In-memory and on-disk catalog caches.
//!
//! The on-disk snapshot lives next to its JSON source as `.<file>.cache`:
//! a bincode [`SnapshotHeader`] followed by the indexed [`Catalog`]. It is
//! only trusted while it is newer than the source and its format version
//! matches this build.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eqs_protocol::Catalog;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};

/// Bumped whenever the snapshot layout or the index contents change.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Leading record of every snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub format_version: u32,
    pub built_at: DateTime<Utc>,
}

impl SnapshotHeader {
    pub fn current() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            built_at: Utc::now(),
        }
    }
}

/// Snapshot location for a JSON catalog: same directory, `.<name>.cache`.
pub fn snapshot_path(json_path: &Path) -> PathBuf {
    let name = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = format!(".{name}.cache");
    match json_path.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Whether the snapshot exists and was modified after the JSON source.
pub async fn snapshot_is_fresh(json_path: &Path, snapshot: &Path) -> bool {
    let (Ok(json_meta), Ok(snap_meta)) = (
        tokio::fs::metadata(json_path).await,
        tokio::fs::metadata(snapshot).await,
    ) else {
        return false;
    };
    match (json_meta.modified(), snap_meta.modified()) {
        (Ok(json_mtime), Ok(snap_mtime)) => snap_mtime > json_mtime,
        _ => false,
    }
}

/// Write `catalog` to `path` through a temporary sibling, then rename.
///
/// Blocking; run it on the blocking pool.
pub fn write_snapshot(path: &Path, catalog: &Catalog) -> CatalogResult<()> {
    let tmp = path.with_extension("cache.tmp");
    let file = File::create(&tmp).map_err(|e| CatalogError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    bincode::serialize_into(&mut writer, &SnapshotHeader::current())
        .and_then(|()| bincode::serialize_into(&mut writer, catalog))
        .map_err(|e| CatalogError::Snapshot(e.to_string()))?;
    writer.flush().map_err(|e| CatalogError::io(&tmp, e))?;
    drop(writer);

    std::fs::rename(&tmp, path).map_err(|e| CatalogError::io(path, e))
}

/// Read a snapshot written by [`write_snapshot`].
///
/// Blocking; run it on the blocking pool.
pub fn read_snapshot(path: &Path) -> CatalogResult<(SnapshotHeader, Catalog)> {
    let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let header: SnapshotHeader = bincode::deserialize_from(&mut reader)
        .map_err(|e| CatalogError::Snapshot(format!("{}: {e}", path.display())))?;
    if header.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(CatalogError::Snapshot(format!(
            "{}: format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
            path.display(),
            header.format_version
        )));
    }

    let catalog: Catalog = bincode::deserialize_from(&mut reader)
        .map_err(|e| CatalogError::Snapshot(format!("{}: {e}", path.display())))?;
    Ok((header, catalog))
}

/// Process-wide map from source path to loaded catalog.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<PathBuf, Arc<Catalog>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &Path) -> Option<Arc<Catalog>> {
        self.entries.read().await.get(path).cloned()
    }

    pub async fn insert(&self, path: &Path, catalog: Arc<Catalog>) {
        self.entries.write().await.insert(path.to_path_buf(), catalog);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
