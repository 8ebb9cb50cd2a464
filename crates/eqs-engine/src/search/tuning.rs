use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Retrieval thresholds and bounds (`[search]` in the config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTuning {
    /// Candidate score per inverted-index hit.
    #[serde(default = "default_index_hit_score")]
    pub index_hit_score: f64,

    /// Per-token bonus when the key contains every query token.
    #[serde(default = "default_all_tokens_bonus")]
    pub all_tokens_bonus: f64,

    /// Admission threshold on the indexed path.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Admission threshold for keys under `.sros.`.
    #[serde(default = "default_sros_score_threshold")]
    pub sros_score_threshold: f64,

    /// Admission threshold during the exhaustive scan.
    #[serde(default = "default_scan_score_threshold")]
    pub scan_score_threshold: f64,

    #[serde(default = "default_alarm_word_score")]
    pub alarm_word_score: f64,

    #[serde(default = "default_alarm_severity_score")]
    pub alarm_severity_score: f64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Candidates retained while scanning, before truncation to `max_results`.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Scan worker threads.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Keys scored per scan task.
    #[serde(default = "default_scan_chunk_size")]
    pub scan_chunk_size: usize,

    /// Drop WHERE conditions on fields the entry does not declare.
    #[serde(default)]
    pub validate_conditions: bool,
}

fn default_index_hit_score() -> f64 {
    10.0
}

fn default_all_tokens_bonus() -> f64 {
    20.0
}

fn default_score_threshold() -> f64 {
    10.0
}

fn default_sros_score_threshold() -> f64 {
    8.0
}

fn default_scan_score_threshold() -> f64 {
    5.0
}

fn default_alarm_word_score() -> f64 {
    10.0
}

fn default_alarm_severity_score() -> f64 {
    5.0
}

fn default_max_results() -> usize {
    10
}

fn default_max_candidates() -> usize {
    20
}

fn default_max_workers() -> usize {
    4
}

fn default_scan_chunk_size() -> usize {
    2000
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            index_hit_score: default_index_hit_score(),
            all_tokens_bonus: default_all_tokens_bonus(),
            score_threshold: default_score_threshold(),
            sros_score_threshold: default_sros_score_threshold(),
            scan_score_threshold: default_scan_score_threshold(),
            alarm_word_score: default_alarm_word_score(),
            alarm_severity_score: default_alarm_severity_score(),
            max_results: default_max_results(),
            max_candidates: default_max_candidates(),
            max_workers: default_max_workers(),
            scan_chunk_size: default_scan_chunk_size(),
            validate_conditions: false,
        }
    }
}

impl SearchTuning {
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_results == 0 {
            return Err(EngineError::InvalidTuning("max_results must be at least 1".into()));
        }
        if self.max_candidates < self.max_results {
            return Err(EngineError::InvalidTuning(format!(
                "max_candidates ({}) must not be below max_results ({})",
                self.max_candidates, self.max_results
            )));
        }
        if self.max_workers == 0 || self.scan_chunk_size == 0 {
            return Err(EngineError::InvalidTuning(
                "max_workers and scan_chunk_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Indexed-path admission threshold for `key`.
    pub fn threshold_for(&self, key: &str) -> f64 {
        if key.contains(".sros.") {
            self.sros_score_threshold
        } else {
            self.score_threshold
        }
    }
}
