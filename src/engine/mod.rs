mod controller;

pub use controller::NudgeEngine;

use serde::Serialize;

use crate::models::{ClassificationResult, Intervention, UsageEpisode, UsagePattern};

/// What the engine concluded about one pickup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDecision {
    /// The stored episode, with its classified context filled in.
    pub episode: UsageEpisode,
    pub classification: ClassificationResult,
    pub pattern: UsagePattern,
    pub intervention: Option<Intervention>,
}
