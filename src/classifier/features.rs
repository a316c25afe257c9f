use std::collections::HashMap;

use chrono::Duration;

use crate::classifier::config::ClassifierConfig;
use crate::models::{ContextFeatures, UsageEpisode};
use crate::utils::time::{local_hour, local_weekday};

/// Build the feature snapshot for `episode` from the episodes that came before it.
///
/// `recent_episodes` may contain the episode itself or later ones; both are ignored.
/// `avg_intervals` maps local hour to the historical average pickup gap in seconds.
pub fn extract_features(
    episode: &UsageEpisode,
    recent_episodes: &[UsageEpisode],
    avg_intervals: Option<&HashMap<u32, f64>>,
    config: &ClassifierConfig,
) -> ContextFeatures {
    let start = episode.start_time;
    let earlier = recent_episodes
        .iter()
        .filter(|other| other.id != episode.id && other.start_time < start);

    let previous_start = earlier.clone().map(|other| other.start_time).max();
    let time_since_last_pickup_secs = previous_start
        .map(|prev| (start - prev).num_milliseconds() as f64 / 1000.0)
        .unwrap_or(config.default_gap_secs);

    let window_start = start - Duration::minutes(config.recent_window_minutes);
    let recent_pickup_count = earlier
        .filter(|other| other.start_time >= window_start)
        .count() as u32;

    let hour_of_day = local_hour(&start);
    let avg_pickup_interval_for_hour = avg_intervals
        .and_then(|intervals| intervals.get(&hour_of_day).copied())
        .unwrap_or(config.default_hourly_interval_secs);

    ContextFeatures {
        time_since_last_pickup_secs,
        hour_of_day,
        notification_triggered: episode.notification_triggered,
        current_duration_secs: episode.duration_secs as f64,
        app_category: episode.app_category,
        recent_pickup_count,
        in_focus_session: episode.in_focus_session,
        day_of_week: local_weekday(&start),
        avg_pickup_interval_for_hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppCategory;
    use crate::utils::time::local_ts;
    use chrono::{DateTime, Utc};

    fn episode(id: &str, start: DateTime<Utc>) -> UsageEpisode {
        UsageEpisode::new(
            id,
            start,
            start + Duration::seconds(42),
            AppCategory::Messaging,
            true,
            true,
        )
    }

    #[test]
    fn defaults_without_history() {
        let current = episode("now", local_ts(2024, 6, 12, 8, 15, 0));
        let features = extract_features(&current, &[], None, &ClassifierConfig::default());

        assert_eq!(features.time_since_last_pickup_secs, 3600.0);
        assert_eq!(features.recent_pickup_count, 0);
        assert_eq!(features.avg_pickup_interval_for_hour, 900.0);
        assert_eq!(features.hour_of_day, 8);
        assert_eq!(features.day_of_week, 3);
        assert_eq!(features.current_duration_secs, 42.0);
        assert!(features.notification_triggered);
        assert!(features.in_focus_session);
    }

    #[test]
    fn gap_and_recent_count_use_prior_episodes_only() {
        let base = local_ts(2024, 6, 12, 10, 0, 0);
        let current = episode("now", base);
        let history = vec![
            episode("old", base - Duration::minutes(90)),
            episode("a", base - Duration::minutes(40)),
            episode("b", base - Duration::seconds(75)),
            current.clone(),
            episode("later", base + Duration::minutes(5)),
        ];
        let mut intervals = HashMap::new();
        intervals.insert(10, 420.0);

        let features = extract_features(
            &current,
            &history,
            Some(&intervals),
            &ClassifierConfig::default(),
        );
        assert_eq!(features.time_since_last_pickup_secs, 75.0);
        assert_eq!(features.recent_pickup_count, 2);
        assert_eq!(features.avg_pickup_interval_for_hour, 420.0);
    }
}
