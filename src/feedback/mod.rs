pub mod coordinator;
pub mod metrics;
mod types;

pub use coordinator::{correction_for, is_success, process_feedback};
pub use metrics::{compute_adaptation_metrics, generate_adaptation_summary};
pub use types::{AdaptationMetrics, AdaptationPhase, FeedbackResult};
