use thiserror::Error;

/// Rejections callers are expected to match on. Storage failures stay `anyhow` errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("feedback for intervention {intervention_id} was already processed")]
    DuplicateFeedback { intervention_id: String },
    #[error("unknown intervention {0}")]
    UnknownIntervention(String),
    #[error("unknown usage episode {0}")]
    UnknownEpisode(String),
}
