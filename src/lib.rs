//! Context-aware phone-usage interventions that personalise themselves from feedback.
//!
//! The pure core (`analysis`, `classifier`, `intervention`, `feedback`) takes explicit
//! inputs and returns new values. `NudgeEngine` owns the learner state for one user and
//! persists it through `Database`.

pub mod analysis;
pub mod classifier;
pub mod db;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod intervention;
pub mod models;
pub mod settings;
pub mod usage;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};

pub use db::Database;
pub use engine::{EpisodeDecision, NudgeEngine};
pub use error::EngineError;
pub use settings::{EngineSettings, SettingsStore};
pub use usage::{
    platform_feed, IngestController, PlatformUsageFeed, UsageEventSource, UsageFeedSender,
};
pub use utils::init_logging;

/// Everything a host app needs to run the engine out of one data directory.
pub struct NudgeRuntime {
    pub db: Database,
    pub engine: NudgeEngine,
    /// Shared with the engine; updates apply to its next operation.
    pub settings: Arc<SettingsStore>,
}

/// Open (or create) the state database and settings under `data_dir` and start an engine.
pub async fn open_runtime(data_dir: &Path) -> Result<NudgeRuntime> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let db = Database::new(data_dir.join("focusnudge.sqlite3"))?;
    let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);
    let engine = NudgeEngine::open(db.clone(), settings.clone(), StdRng::from_entropy()).await?;

    log::info!("focusnudge runtime ready in {}", data_dir.display());

    Ok(NudgeRuntime {
        db,
        engine,
        settings,
    })
}
