use serde::{Deserialize, Serialize};

use crate::models::{AdaptationState, ContextWeights, Intervention};

/// Everything one feedback event changes. The caller persists all three snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackResult {
    pub intervention: Intervention,
    pub weights: ContextWeights,
    pub adaptation: AdaptationState,
    /// The Bernoulli outcome fed to the bandit.
    pub success: bool,
    pub weights_updated: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationPhase {
    Learning,
    Adapting,
    Stable,
}

impl AdaptationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdaptationPhase::Learning => "learning",
            AdaptationPhase::Adapting => "adapting",
            AdaptationPhase::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationMetrics {
    pub total_feedback: u32,
    pub helpful_rate: f64,
    pub context_correction_rate: f64,
    /// Positive-outcome rate of the later half minus the earlier half.
    pub outcome_improvement: f64,
    pub adaptation_phase: AdaptationPhase,
}

impl Default for AdaptationMetrics {
    fn default() -> Self {
        Self {
            total_feedback: 0,
            helpful_rate: 0.0,
            context_correction_rate: 0.0,
            outcome_improvement: 0.0,
            adaptation_phase: AdaptationPhase::Learning,
        }
    }
}
