use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{
        format_datetime, parse_category, parse_context, parse_datetime, parse_optional_context,
    },
};
use crate::models::UsageEpisode;

const EPISODE_COLUMNS: &str = "id, start_time, end_time, duration_secs, app_category,
     in_focus_session, notification_triggered, classified_context, user_corrected_context";

fn row_to_episode(row: &Row) -> Result<UsageEpisode> {
    let start_time: String = row.get("start_time")?;
    let end_time: String = row.get("end_time")?;
    let app_category: String = row.get("app_category")?;
    let classified_context: String = row.get("classified_context")?;

    Ok(UsageEpisode {
        id: row.get("id")?,
        start_time: parse_datetime(&start_time, "start_time")?,
        end_time: parse_datetime(&end_time, "end_time")?,
        duration_secs: row.get("duration_secs")?,
        app_category: parse_category(&app_category)?,
        in_focus_session: row.get("in_focus_session")?,
        notification_triggered: row.get("notification_triggered")?,
        classified_context: parse_context(&classified_context)?,
        user_corrected_context: parse_optional_context(row.get("user_corrected_context")?)?,
    })
}

impl Database {
    pub async fn insert_episode(&self, episode: &UsageEpisode) -> Result<()> {
        let record = episode.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO usage_episodes (
                    id, start_time, end_time, duration_secs, app_category, in_focus_session,
                    notification_triggered, classified_context, user_corrected_context
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    format_datetime(&record.start_time),
                    format_datetime(&record.end_time),
                    record.duration_secs,
                    record.app_category.as_str(),
                    record.in_focus_session,
                    record.notification_triggered,
                    record.classified_context.as_str(),
                    record.user_corrected_context.map(|c| c.as_str()),
                ],
            )
            .with_context(|| format!("failed to insert usage episode {}", record.id))?;
            Ok(())
        })
        .await
    }

    pub async fn get_episode(&self, episode_id: &str) -> Result<Option<UsageEpisode>> {
        let episode_id = episode_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EPISODE_COLUMNS} FROM usage_episodes WHERE id = ?1"
            ))?;
            let mut rows = stmt.query(params![episode_id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_episode(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Episodes starting in `[start, end)`, oldest first.
    pub async fn get_episodes_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageEpisode>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EPISODE_COLUMNS} FROM usage_episodes
                 WHERE start_time >= ?1 AND start_time < ?2
                 ORDER BY start_time ASC"
            ))?;
            let mut rows = stmt.query(params![format_datetime(&start), format_datetime(&end)])?;
            let mut episodes = Vec::new();
            while let Some(row) = rows.next()? {
                episodes.push(row_to_episode(row)?);
            }
            Ok(episodes)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, UsageContext};
    use chrono::{Duration, TimeZone};

    fn episode(id: &str, start: DateTime<Utc>) -> UsageEpisode {
        let mut episode = UsageEpisode::new(
            id,
            start,
            start + Duration::seconds(25),
            AppCategory::Entertainment,
            true,
            true,
        );
        episode.classified_context = UsageContext::BoredomHabit;
        episode
    }

    #[tokio::test]
    async fn episodes_round_trip_and_filter_by_time() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("state.sqlite3")).expect("db");
        let base = Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap();

        for (id, offset) in [("a", 0), ("b", 30), ("c", 90)] {
            db.insert_episode(&episode(id, base + Duration::minutes(offset)))
                .await
                .expect("insert");
        }

        let fetched = db.get_episode("b").await.expect("get").expect("present");
        assert_eq!(fetched, episode("b", base + Duration::minutes(30)));
        assert!(db.get_episode("zzz").await.expect("get").is_none());

        let window = db
            .get_episodes_between(base + Duration::minutes(10), base + Duration::minutes(90))
            .await
            .expect("between");
        let ids: Vec<_> = window.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn duplicate_episode_ids_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Database::new(dir.path().join("state.sqlite3")).expect("db");
        let start = Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap();
        db.insert_episode(&episode("a", start)).await.expect("first");
        assert!(db.insert_episode(&episode("a", start)).await.is_err());
    }
}
