//! Catalog source abstraction: load an indexed catalog from disk, a cache or a mock.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use eqs_protocol::Catalog;

use crate::error::CatalogResult;

/// Anything that can hand out an indexed, immutable catalog for a source path.
///
/// Implemented by [`crate::CachedCatalogLoader`] for real files and by
/// [`crate::MockCatalogSource`] for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the catalog materialized from `path`.
    ///
    /// The returned catalog carries its inverted index.
    async fn load(&self, path: &Path) -> CatalogResult<Arc<Catalog>>;
}
