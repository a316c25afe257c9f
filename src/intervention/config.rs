use serde::{Deserialize, Serialize};

/// Thresholds for the graduated response ladder and the bandit safety clamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorConfig {
    /// In a focus session: compulsiveness above this locks apps softly.
    pub focus_soft_lock_compulsiveness: f64,
    /// In a focus session: pickups per hour above this ask for reflection.
    pub focus_reflection_frequency: f64,

    /// Outside a focus session: compulsiveness above this asks for reflection.
    pub reflection_compulsiveness: f64,
    pub usage_summary_frequency: f64,
    pub friction_delay_frequency: f64,

    /// Below this compulsiveness the bandit may not pick levels ranked above `safety_max_rank`.
    pub safety_compulsiveness: f64,
    pub safety_max_rank: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            focus_soft_lock_compulsiveness: 0.6,
            focus_reflection_frequency: 8.0,
            reflection_compulsiveness: 0.7,
            usage_summary_frequency: 10.0,
            friction_delay_frequency: 6.0,
            safety_compulsiveness: 0.3,
            safety_max_rank: 2,
        }
    }
}
