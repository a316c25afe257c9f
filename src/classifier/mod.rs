pub mod config;
pub mod features;
pub mod learning;
pub mod model;
pub mod scoring;

pub use config::ClassifierConfig;
pub use features::extract_features;
pub use learning::update_weights_from_feedback;
pub use model::{classify_context, classify_episodes, softmax, ClassifiedEpisode};
pub use scoring::active_indicators;
