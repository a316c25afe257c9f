use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::analysis::config::AnalysisConfig;
use crate::models::{AnomalyReport, AppCategory, UsageEpisode, UsagePattern};
use crate::utils::time::local_hour;

const ANOMALY_FREQUENCY_WEIGHT: f64 = 0.3;
const ANOMALY_SCREEN_TIME_WEIGHT: f64 = 0.3;
const ANOMALY_COMPULSIVENESS_WEIGHT: f64 = 0.4;

/// Aggregate the episodes that started inside the trailing window ending at `now`.
///
/// The hourly distribution is built from the whole history.
pub fn analyze_usage_pattern(
    episodes: &[UsageEpisode],
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> UsagePattern {
    let cutoff = now - Duration::minutes(i64::from(config.window_minutes));
    let windowed: Vec<&UsageEpisode> = episodes
        .iter()
        .filter(|episode| episode.start_time >= cutoff)
        .collect();

    let mut pattern = UsagePattern::empty();
    pattern.hourly_distribution = hourly_distribution(episodes);

    if windowed.is_empty() {
        return pattern;
    }

    let pickup_count = windowed.len() as u32;
    let total_screen_time_secs: i64 = windowed.iter().map(|e| e.duration_secs).sum();
    let compulsive = windowed
        .iter()
        .filter(|e| e.duration_secs < config.compulsive_episode_secs)
        .count();

    let window_hours = f64::from(config.window_minutes) / 60.0;
    pattern.pickup_count = pickup_count;
    pattern.total_screen_time_secs = total_screen_time_secs;
    pattern.avg_episode_duration_secs = total_screen_time_secs as f64 / f64::from(pickup_count);
    pattern.dominant_category = dominant_category(windowed.iter().copied());
    pattern.pickup_frequency = if window_hours > 0.0 {
        f64::from(pickup_count) / window_hours
    } else {
        0.0
    };
    pattern.compulsiveness_score = compulsive as f64 / f64::from(pickup_count);
    pattern
}

/// Most frequent category; ties go to the lowest `AppCategory` ordinal.
pub fn dominant_category<'a>(episodes: impl IntoIterator<Item = &'a UsageEpisode>) -> AppCategory {
    let mut counts = [0u32; AppCategory::ALL.len()];
    for episode in episodes {
        counts[episode.app_category.ordinal()] += 1;
    }

    let mut best: Option<(AppCategory, u32)> = None;
    for category in AppCategory::ALL {
        let count = counts[category.ordinal()];
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((category, count)),
        }
    }

    best.map(|(category, _)| category)
        .unwrap_or(AppCategory::Unknown)
}

pub fn hourly_distribution(episodes: &[UsageEpisode]) -> [u32; 24] {
    let mut buckets = [0u32; 24];
    for episode in episodes {
        buckets[local_hour(&episode.start_time) as usize] += 1;
    }
    buckets
}

/// Average gap in seconds between consecutive pickups, keyed by the hour of the later pickup.
///
/// Hours without at least one gap are absent; feature extraction falls back to its default.
pub fn hourly_average_intervals(episodes: &[UsageEpisode]) -> HashMap<u32, f64> {
    let mut starts: Vec<DateTime<Utc>> = episodes.iter().map(|e| e.start_time).collect();
    starts.sort();

    let mut sums: HashMap<u32, (f64, u32)> = HashMap::new();
    for pair in starts.windows(2) {
        let gap = (pair[1] - pair[0]).num_seconds() as f64;
        let entry = sums.entry(local_hour(&pair[1])).or_insert((0.0, 0));
        entry.0 += gap;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(hour, (total, count))| (hour, total / f64::from(count)))
        .collect()
}

/// Compare a current window against a baseline window.
pub fn detect_anomalous_usage(
    current: &UsagePattern,
    baseline: &UsagePattern,
    config: &AnalysisConfig,
) -> AnomalyReport {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let frequency_ratio = ratio(current.pickup_frequency, baseline.pickup_frequency);
    if frequency_ratio > config.anomaly_ratio {
        score += ANOMALY_FREQUENCY_WEIGHT;
        reasons.push(format!(
            "pickup frequency is {} baseline",
            describe_ratio(frequency_ratio)
        ));
    }

    let screen_time_ratio = ratio(
        current.total_screen_time_secs as f64,
        baseline.total_screen_time_secs as f64,
    );
    if screen_time_ratio > config.anomaly_ratio {
        score += ANOMALY_SCREEN_TIME_WEIGHT;
        reasons.push(format!(
            "screen time is {} baseline",
            describe_ratio(screen_time_ratio)
        ));
    }

    let compulsiveness_delta = current.compulsiveness_score - baseline.compulsiveness_score;
    if compulsiveness_delta > config.compulsiveness_delta {
        score += ANOMALY_COMPULSIVENESS_WEIGHT;
        reasons.push(format!(
            "short compulsive pickups up {:.0} points",
            compulsiveness_delta * 100.0
        ));
    }

    let anomaly_score = f64::clamp(score, 0.0, 1.0);
    let reason = if reasons.is_empty() {
        "Usage within normal range".to_string()
    } else {
        let mut joined = reasons.join("; ");
        if let Some(first) = joined.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        joined
    };

    AnomalyReport {
        is_anomalous: anomaly_score >= config.anomaly_flag_score,
        anomaly_score,
        reason,
    }
}

/// A zero baseline makes any positive value infinitely larger; 0/0 is no change.
fn ratio(current: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        current / baseline
    } else if current > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

fn describe_ratio(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{ratio:.1}x")
    } else {
        "far above".to_string()
    }
}
