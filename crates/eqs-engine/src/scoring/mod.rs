pub mod scorer;
pub mod weights;

pub use scorer::{ScoreBreakdown, Scorer};
pub use weights::ScoringWeights;
