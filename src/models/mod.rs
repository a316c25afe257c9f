pub mod adaptation;
pub mod context;
pub mod episode;
pub mod intervention;
pub mod pattern;

pub use adaptation::{AdaptationState, ArmEstimate, BanditArm, QuietHours};
pub use context::{
    ClassificationResult, ContextFeatures, ContextWeights, FeatureIndicator, UsageContext,
};
pub use episode::{AppCategory, UsageEpisode};
pub use intervention::{
    FeedbackRecord, Intervention, InterventionFeedback, InterventionLevel, InterventionOutcome,
};
pub use pattern::{AnomalyReport, CategoryUsage, DailySummary, UsagePattern};
