use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime, parse_level, parse_optional_context, parse_outcome},
};
use crate::models::{Intervention, InterventionFeedback};

fn row_to_intervention(row: &Row) -> Result<Intervention> {
    let timestamp: String = row.get("timestamp")?;
    let level: String = row.get("level")?;
    let outcome: Option<String> = row.get("outcome")?;

    let feedback_timestamp: Option<String> = row.get("feedback_timestamp")?;
    let feedback = match feedback_timestamp {
        Some(raw) => Some(InterventionFeedback {
            helpful: row.get("helpful")?,
            context_correct: row.get("context_correct")?,
            corrected_context: parse_optional_context(row.get("corrected_context")?)?,
            reason: row.get("reason")?,
            timestamp: parse_datetime(&raw, "feedback timestamp")?,
        }),
        None => None,
    };

    Ok(Intervention {
        id: row.get("id")?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        level: parse_level(&level)?,
        episode_id: row.get("episode_id")?,
        message: row.get("message")?,
        acknowledged: row.get("acknowledged")?,
        feedback,
        outcome: outcome.as_deref().map(parse_outcome).transpose()?,
    })
}

impl Database {
    pub async fn insert_intervention(&self, intervention: &Intervention) -> Result<()> {
        let record = intervention.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO interventions (
                    id, timestamp, level, episode_id, message, acknowledged, outcome
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    format_datetime(&record.timestamp),
                    record.level.as_str(),
                    record.episode_id,
                    record.message,
                    record.acknowledged,
                    record.outcome.map(|o| o.as_str()),
                ],
            )
            .with_context(|| format!("failed to insert intervention {}", record.id))?;
            Ok(())
        })
        .await
    }

    pub async fn get_intervention(&self, intervention_id: &str) -> Result<Option<Intervention>> {
        let intervention_id = intervention_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT i.id AS id, i.timestamp AS timestamp, i.level AS level,
                        i.episode_id AS episode_id, i.message AS message,
                        i.acknowledged AS acknowledged, i.outcome AS outcome,
                        f.helpful AS helpful, f.context_correct AS context_correct,
                        f.corrected_context AS corrected_context, f.reason AS reason,
                        f.timestamp AS feedback_timestamp
                 FROM interventions i
                 LEFT JOIN feedback_events f ON f.intervention_id = i.id
                 WHERE i.id = ?1",
            )?;
            let mut rows = stmt.query(params![intervention_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_intervention(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}
