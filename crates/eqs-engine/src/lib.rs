//! Natural-language search over EDA state-table catalogs.
//!
//! Provides tokenization with synonym expansion, inverted-index construction,
//! heuristic relevance scoring, rule-based EQL clause extraction, and a
//! [`SearchEngine`] that ties them together over an immutable catalog.

pub mod error;
pub mod index;
pub mod rules;
pub mod scoring;
pub mod search;
pub mod settings;
pub mod tokenizer;

// Re-export key types for convenience
pub use error::{EngineError, EngineResult};
pub use index::build_inverted_index;
pub use rules::{ClauseExtractor, RuleOverrides, RuleTables};
pub use scoring::{ScoreBreakdown, Scorer, ScoringWeights};
pub use search::{SearchEngine, SearchTuning};
pub use settings::EngineSettings;
pub use tokenizer::{QueryTerms, Tokenizer};
