use serde::{Deserialize, Serialize};

/// Tunable thresholds for usage-pattern aggregation and anomaly detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Trailing window used for the rolling pattern.
    pub window_minutes: u32,

    /// Episodes shorter than this count toward the compulsiveness score.
    pub compulsive_episode_secs: i64,

    /// Current/baseline ratio above which frequency or screen time is flagged.
    pub anomaly_ratio: f64,
    /// Compulsiveness increase over baseline that gets flagged.
    pub compulsiveness_delta: f64,
    /// Score at or above which a report counts as anomalous.
    pub anomaly_flag_score: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_minutes: 60,
            compulsive_episode_secs: 30,
            anomaly_ratio: 1.5,
            compulsiveness_delta: 0.2,
            anomaly_flag_score: 0.5,
        }
    }
}
