use serde::{Deserialize, Serialize};

/// Every named weight used by the scorer (`[scoring]` in the config file).
///
/// Unspecified keys keep their defaults, so a config only lists what it tunes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    // ── Keyword matching ──
    pub last_segment_match: f64,
    pub keyword_match_interface: f64,
    pub keyword_match_statistics: f64,
    pub keyword_match_state: f64,
    pub keyword_match_default: f64,
    pub text_match: f64,
    pub all_words_match_bonus: f64,

    // ── Description matching ──
    pub description_word_match: f64,
    pub description_list_match: f64,
    pub description_all_match: f64,
    pub description_show_match: f64,
    pub description_get_match: f64,
    pub description_multi_match: f64,

    // ── Interface context ──
    pub interface_end_match: f64,
    pub interface_stats_match: f64,
    pub interface_plural_match: f64,
    pub interface_security_penalty: f64,
    pub interface_protocol_penalty: f64,

    // ── BGP context ──
    pub bgp_neighbor_match: f64,
    pub bgp_session_state_bonus: f64,
    pub bgp_non_neighbor_penalty: f64,
    pub bgp_general_match: f64,
    pub bgp_maintenance_penalty: f64,
    pub bgp_maintenance_session_penalty: f64,

    // ── Path depth ──
    pub path_depth_bonus_2: f64,
    pub path_depth_bonus_3: f64,
    pub path_depth_bonus_4: f64,
    pub path_depth_penalty_factor: f64,

    // ── Segment distance ──
    pub segment_exact_match: f64,
    pub segment_near_match: f64,
    pub segment_far_match: f64,

    // ── Other matches ──
    pub subinterface_exact_match: f64,
    pub subinterface_partial_match: f64,
    pub exact_table_match: f64,
    pub bigram_match: f64,
    pub field_extract: f64,
    pub sequence_match: f64,
    pub sequence_partial_match: f64,
    pub show_state_bonus: f64,

    // ── Penalties and field-presence bonuses ──
    pub protocol_penalty: f64,
    pub maintenance_penalty: f64,
    pub error_field_bonus: f64,
    pub bandwidth_field_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            last_segment_match: 10.0,
            keyword_match_interface: 8.0,
            keyword_match_statistics: 6.0,
            keyword_match_state: 4.0,
            keyword_match_default: 3.0,
            text_match: 1.0,
            all_words_match_bonus: 3.0,

            description_word_match: 3.0,
            description_list_match: 5.0,
            description_all_match: 3.0,
            description_show_match: 2.0,
            description_get_match: 2.0,
            description_multi_match: 5.0,

            interface_end_match: 20.0,
            interface_stats_match: 15.0,
            interface_plural_match: 10.0,
            interface_security_penalty: -20.0,
            interface_protocol_penalty: -15.0,

            bgp_neighbor_match: 15.0,
            bgp_session_state_bonus: 20.0,
            bgp_non_neighbor_penalty: -15.0,
            bgp_general_match: 10.0,
            bgp_maintenance_penalty: -10.0,
            bgp_maintenance_session_penalty: -25.0,

            path_depth_bonus_2: 20.0,
            path_depth_bonus_3: 10.0,
            path_depth_bonus_4: 5.0,
            path_depth_penalty_factor: 2.0,

            segment_exact_match: 10.0,
            segment_near_match: 6.0,
            segment_far_match: 2.0,

            subinterface_exact_match: 10.0,
            subinterface_partial_match: 2.0,
            exact_table_match: 6.0,
            bigram_match: 2.0,
            field_extract: 1.5,
            sequence_match: 8.0,
            sequence_partial_match: 4.0,
            show_state_bonus: 5.0,

            protocol_penalty: -10.0,
            maintenance_penalty: -8.0,
            error_field_bonus: 10.0,
            bandwidth_field_bonus: 10.0,
        }
    }
}
