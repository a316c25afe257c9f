use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::{connection::Database, helpers::format_datetime};
use crate::models::{AdaptationState, ContextWeights};

pub(crate) const WEIGHTS_KEY: &str = "context_weights";
pub(crate) const ADAPTATION_KEY: &str = "adaptation_state";

pub(crate) fn upsert_snapshot<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let payload = serde_json::to_string(value)
        .with_context(|| format!("failed to serialize {key} snapshot"))?;
    conn.execute(
        "INSERT INTO learner_state (key, payload, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE
         SET payload = excluded.payload, updated_at = excluded.updated_at",
        params![key, payload, format_datetime(&Utc::now())],
    )
    .with_context(|| format!("failed to save {key} snapshot"))?;
    Ok(())
}

fn load_snapshot<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM learner_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    payload
        .map(|raw| {
            serde_json::from_str(&raw).with_context(|| format!("corrupt {key} snapshot"))
        })
        .transpose()
}

impl Database {
    pub async fn load_weights(&self) -> Result<Option<ContextWeights>> {
        self.execute(|conn| load_snapshot(conn, WEIGHTS_KEY)).await
    }

    pub async fn load_adaptation(&self) -> Result<Option<AdaptationState>> {
        self.execute(|conn| load_snapshot(conn, ADAPTATION_KEY)).await
    }

    pub async fn save_weights(&self, weights: &ContextWeights) -> Result<()> {
        let snapshot = weights.clone();
        self.execute(move |conn| upsert_snapshot(conn, WEIGHTS_KEY, &snapshot))
            .await
    }

    pub async fn save_adaptation(&self, state: &AdaptationState) -> Result<()> {
        let snapshot = state.clone();
        self.execute(move |conn| upsert_snapshot(conn, ADAPTATION_KEY, &snapshot))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::{initialize_adaptation, update_adaptation};
    use crate::models::{FeatureIndicator, InterventionLevel, QuietHours, UsageContext};

    #[tokio::test]
    async fn snapshots_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("state.sqlite3")).expect("db");

        assert!(db.load_weights().await.expect("load").is_none());
        assert!(db.load_adaptation().await.expect("load").is_none());

        let mut weights = ContextWeights::new();
        weights
            .adjustments
            .entry(UsageContext::AnxietyCheck)
            .or_default()
            .insert(FeatureIndicator::InFocusSession, 0.15);
        weights.correction_count = 3;
        db.save_weights(&weights).await.expect("save");
        assert_eq!(db.load_weights().await.expect("load"), Some(weights));

        let state = update_adaptation(
            &initialize_adaptation().with_quiet_hours(vec![QuietHours::new(22, 7)]),
            UsageContext::BoredomHabit,
            InterventionLevel::SoftLock,
            true,
            Utc::now(),
        );
        db.save_adaptation(&state).await.expect("save");
        // Saving again overwrites rather than duplicating.
        db.save_adaptation(&state).await.expect("save again");
        assert_eq!(db.load_adaptation().await.expect("load"), Some(state));
    }
}
