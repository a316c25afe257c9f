use serde::{Deserialize, Serialize};

use super::episode::AppCategory;

/// Rolling statistics over a trailing window. Recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsagePattern {
    pub pickup_count: u32,
    pub total_screen_time_secs: i64,
    pub avg_episode_duration_secs: f64,
    pub dominant_category: AppCategory,
    /// Pickups per hour.
    pub pickup_frequency: f64,
    /// Fraction of episodes shorter than the compulsive threshold.
    pub compulsiveness_score: f64,
    /// Pickups per hour of day across the whole history, not just the window.
    pub hourly_distribution: [u32; 24],
}

impl UsagePattern {
    pub fn empty() -> Self {
        Self {
            pickup_count: 0,
            total_screen_time_secs: 0,
            avg_episode_duration_secs: 0.0,
            dominant_category: AppCategory::Unknown,
            pickup_frequency: 0.0,
            compulsiveness_score: 0.0,
            hourly_distribution: [0; 24],
        }
    }

    pub fn screen_time_minutes(&self) -> i64 {
        (self.total_screen_time_secs as f64 / 60.0).round() as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub is_anomalous: bool,
    pub anomaly_score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    pub category: AppCategory,
    pub count: u32,
    pub minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total_pickups: u32,
    pub total_minutes: f64,
    pub avg_session_secs: f64,
    pub longest_session_minutes: f64,
    /// Sorted by minutes, descending.
    pub categories: Vec<CategoryUsage>,
    pub peak_hour: u32,
    pub compulsiveness_score: f64,
}
