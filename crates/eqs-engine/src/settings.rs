use serde::{Deserialize, Serialize};

use crate::rules::RuleOverrides;
use crate::scoring::ScoringWeights;
use crate::search::SearchTuning;

/// Everything configurable about the engine, as loaded from the
/// `[scoring]`, `[search]` and `[rules]` config sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub search: SearchTuning,
    #[serde(default)]
    pub rules: RuleOverrides,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_deserialize_independently() {
        let settings: EngineSettings = toml::from_str(
            r#"
            [scoring]
            bigram_match = 4.0

            [search]
            max_results = 5

            [[rules.pattern]]
            field = "oper-state"
            value = "testing"
            patterns = ["testing"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.scoring.bigram_match, 4.0);
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(settings.search.max_candidates, 20);
        assert_eq!(settings.rules.pattern.len(), 1);
    }
}
