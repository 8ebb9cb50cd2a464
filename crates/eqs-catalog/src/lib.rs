//! Catalog collaborators for EQL query search.
//!
//! Provides the `CatalogSource` abstraction, a three-tier cached loader
//! (memory, bincode snapshot, JSON with index build), release download and
//! extraction, and a mock source with sample SRL/SROS catalogs.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod mock;
pub mod source;

// Re-export key types for convenience
pub use error::{CatalogError, CatalogResult};
pub use fetch::{CatalogConfig, CatalogFetcher};
pub use loader::{CachedCatalogLoader, LoadTier};
pub use mock::MockCatalogSource;
pub use source::CatalogSource;
