use serde::{Deserialize, Serialize};

/// Tunable constants for feature extraction, scoring and weight learning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    /// Softmax temperature; lower values sharpen the distribution.
    pub softmax_temperature: f64,
    /// Fixed score of the `unknown` context.
    pub unknown_baseline: f64,

    /// Step applied to the corrected context on each user correction.
    pub learning_rate: f64,
    /// Fraction of `learning_rate` taken from the wrongly predicted context.
    pub penalty_factor: f64,

    /// Gap assumed when there is no prior pickup in the history.
    pub default_gap_secs: f64,
    /// Hourly pickup interval assumed when the caller has no history for that hour.
    pub default_hourly_interval_secs: f64,
    /// Look-back used for the recent pickup count.
    pub recent_window_minutes: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            softmax_temperature: 0.3,
            unknown_baseline: 0.1,
            learning_rate: 0.05,
            penalty_factor: 0.5,
            default_gap_secs: 3600.0,
            default_hourly_interval_secs: 900.0,
            recent_window_minutes: 60,
        }
    }
}
