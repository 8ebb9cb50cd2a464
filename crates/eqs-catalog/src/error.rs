//! Catalog loading and download error types.

use thiserror::Error;

/// Errors that can occur while loading, caching or fetching a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("catalog not found: {0}")]
    NotFound(String),

    #[error("invalid catalog JSON in {path}: {message}")]
    Decode { path: String, message: String },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("failed to download {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to extract archive: {0}")]
    Extract(String),

    #[error("expected catalog file not found after extraction: {0}")]
    MissingAfterExtract(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl CatalogError {
    /// Map an I/O error on `path`, keeping "not found" distinguishable.
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            CatalogError::NotFound(path.display().to_string())
        } else {
            CatalogError::Io(format!("{}: {err}", path.display()))
        }
    }
}

impl From<tokio::task::JoinError> for CatalogError {
    fn from(err: tokio::task::JoinError) -> Self {
        CatalogError::Task(err.to_string())
    }
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
