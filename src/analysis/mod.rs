pub mod config;
pub mod daily;
pub mod window;

pub use config::AnalysisConfig;
pub use daily::compute_daily_summary;
pub use window::{
    analyze_usage_pattern, detect_anomalous_usage, dominant_category, hourly_average_intervals,
    hourly_distribution,
};
