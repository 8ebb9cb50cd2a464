//! Engine construction errors.
//!
//! Searching never fails; these surface only while rule tables and tuning
//! are being validated, before the first query runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid pattern for field '{field}' ({pattern}): {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("capture rule for field '{field}' has no capture group: {pattern}")]
    MissingCaptureGroup { field: String, pattern: String },

    #[error("rule for field '{0}' has no trigger patterns")]
    EmptyRule(String),

    #[error("invalid search tuning: {0}")]
    InvalidTuning(String),
}

/// Convenience alias for engine construction results.
pub type EngineResult<T> = Result<T, EngineError>;
