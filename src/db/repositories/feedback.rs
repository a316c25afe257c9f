use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime, parse_optional_context, parse_outcome},
    repositories::learner_state::{upsert_snapshot, ADAPTATION_KEY, WEIGHTS_KEY},
};
use crate::error::EngineError;
use crate::models::{
    AdaptationState, ContextWeights, FeedbackRecord, Intervention, InterventionFeedback,
    InterventionOutcome, UsageContext,
};

/// Everything one processed feedback event writes, committed in a single transaction.
#[derive(Debug, Clone)]
pub struct FeedbackCommit {
    pub intervention: Intervention,
    pub feedback: InterventionFeedback,
    pub outcome: InterventionOutcome,
    pub corrected_episode: Option<(String, UsageContext)>,
    pub weights: ContextWeights,
    pub adaptation: AdaptationState,
}

impl Database {
    /// Fails with `EngineError::DuplicateFeedback` if the intervention already has feedback.
    pub async fn commit_feedback(&self, commit: FeedbackCommit) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open feedback transaction")?;

            let already: i64 = tx.query_row(
                "SELECT COUNT(*) FROM feedback_events WHERE intervention_id = ?1",
                params![commit.intervention.id],
                |row| row.get(0),
            )?;
            if already > 0 {
                return Err(EngineError::DuplicateFeedback {
                    intervention_id: commit.intervention.id.clone(),
                }
                .into());
            }

            tx.execute(
                "INSERT INTO feedback_events (
                    intervention_id, helpful, context_correct, corrected_context, reason,
                    outcome, timestamp
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    commit.intervention.id,
                    commit.feedback.helpful,
                    commit.feedback.context_correct,
                    commit.feedback.corrected_context.map(|c| c.as_str()),
                    commit.feedback.reason,
                    commit.outcome.as_str(),
                    format_datetime(&commit.feedback.timestamp),
                ],
            )
            .context("failed to insert feedback event")?;

            tx.execute(
                "UPDATE interventions SET acknowledged = ?1, outcome = ?2 WHERE id = ?3",
                params![
                    commit.intervention.acknowledged,
                    commit.outcome.as_str(),
                    commit.intervention.id,
                ],
            )
            .context("failed to acknowledge intervention")?;

            if let Some((episode_id, context)) = &commit.corrected_episode {
                tx.execute(
                    "UPDATE usage_episodes SET user_corrected_context = ?1 WHERE id = ?2",
                    params![context.as_str(), episode_id],
                )
                .context("failed to record corrected context")?;
            }

            upsert_snapshot(&tx, WEIGHTS_KEY, &commit.weights)?;
            upsert_snapshot(&tx, ADAPTATION_KEY, &commit.adaptation)?;

            tx.commit().context("failed to commit feedback")?;
            Ok(())
        })
        .await
    }

    /// All feedback, oldest first.
    pub async fn feedback_history(&self) -> Result<Vec<FeedbackRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT helpful, context_correct, corrected_context, reason, outcome, timestamp
                 FROM feedback_events
                 ORDER BY timestamp ASC",
            )?;
            let mut rows = stmt.query([])?;
            let mut history = Vec::new();
            while let Some(row) = rows.next()? {
                let outcome: String = row.get("outcome")?;
                let timestamp: String = row.get("timestamp")?;
                let timestamp = parse_datetime(&timestamp, "timestamp")?;
                history.push(FeedbackRecord {
                    feedback: InterventionFeedback {
                        helpful: row.get("helpful")?,
                        context_correct: row.get("context_correct")?,
                        corrected_context: parse_optional_context(row.get("corrected_context")?)?,
                        reason: row.get("reason")?,
                        timestamp,
                    },
                    outcome: parse_outcome(&outcome)?,
                    timestamp,
                });
            }
            Ok(history)
        })
        .await
    }
}
