use crate::analysis::config::AnalysisConfig;
use crate::models::{AppCategory, CategoryUsage, DailySummary, UsageEpisode};
use crate::utils::time::local_hour;

/// Summarize a day's episodes. Callers choose which episodes make up the day.
pub fn compute_daily_summary(episodes: &[UsageEpisode], config: &AnalysisConfig) -> DailySummary {
    let total_pickups = episodes.len() as u32;
    let total_secs: i64 = episodes.iter().map(|e| e.duration_secs).sum();
    let longest_secs = episodes.iter().map(|e| e.duration_secs).max().unwrap_or(0);

    let mut per_category = [(0u32, 0i64); AppCategory::ALL.len()];
    let mut per_hour = [0u32; 24];
    let mut compulsive = 0u32;
    for episode in episodes {
        let slot = &mut per_category[episode.app_category.ordinal()];
        slot.0 += 1;
        slot.1 += episode.duration_secs;
        per_hour[local_hour(&episode.start_time) as usize] += 1;
        if episode.duration_secs < config.compulsive_episode_secs {
            compulsive += 1;
        }
    }

    let mut categories: Vec<CategoryUsage> = AppCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let (count, secs) = per_category[category.ordinal()];
            (count > 0).then(|| CategoryUsage {
                category,
                count,
                minutes: secs as f64 / 60.0,
            })
        })
        .collect();
    // Stable sort keeps ordinal order among equal minutes.
    categories.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));

    DailySummary {
        total_pickups,
        total_minutes: total_secs as f64 / 60.0,
        avg_session_secs: if total_pickups > 0 {
            total_secs as f64 / f64::from(total_pickups)
        } else {
            0.0
        },
        longest_session_minutes: longest_secs as f64 / 60.0,
        categories,
        peak_hour: peak_hour(&per_hour),
        compulsiveness_score: if total_pickups > 0 {
            f64::from(compulsive) / f64::from(total_pickups)
        } else {
            0.0
        },
    }
}

/// First hour holding the maximum count.
fn peak_hour(per_hour: &[u32; 24]) -> u32 {
    let mut best = 0;
    for hour in 1..24 {
        if per_hour[hour] > per_hour[best] {
            best = hour;
        }
    }
    best as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::local_ts;
    use chrono::Duration;

    fn episode(id: &str, hour: u32, secs: i64, category: AppCategory) -> UsageEpisode {
        let start = local_ts(2024, 6, 12, hour, 0, 0);
        UsageEpisode::new(id, start, start + Duration::seconds(secs), category, false, false)
    }

    #[test]
    fn empty_day() {
        let summary = compute_daily_summary(&[], &AnalysisConfig::default());
        assert_eq!(summary.total_pickups, 0);
        assert_eq!(summary.avg_session_secs, 0.0);
        assert!(summary.categories.is_empty());
        assert_eq!(summary.peak_hour, 0);
        assert_eq!(summary.compulsiveness_score, 0.0);
    }

    #[test]
    fn summary_totals_and_ordering() {
        let episodes = vec![
            episode("a", 9, 600, AppCategory::Productivity),
            episode("b", 13, 15, AppCategory::SocialMedia),
            episode("c", 13, 1200, AppCategory::SocialMedia),
            episode("d", 20, 45, AppCategory::Messaging),
        ];
        let summary = compute_daily_summary(&episodes, &AnalysisConfig::default());

        assert_eq!(summary.total_pickups, 4);
        assert!((summary.total_minutes - 31.0).abs() < 1e-9);
        assert!((summary.avg_session_secs - 465.0).abs() < 1e-9);
        assert!((summary.longest_session_minutes - 20.0).abs() < 1e-9);
        assert_eq!(summary.peak_hour, 13);
        assert!((summary.compulsiveness_score - 0.25).abs() < 1e-9);

        let order: Vec<_> = summary.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                AppCategory::SocialMedia,
                AppCategory::Productivity,
                AppCategory::Messaging
            ]
        );
        assert_eq!(summary.categories[0].count, 2);
    }

    #[test]
    fn peak_hour_ties_pick_earliest() {
        let episodes = vec![
            episode("a", 18, 60, AppCategory::Utility),
            episode("b", 8, 60, AppCategory::Utility),
        ];
        let summary = compute_daily_summary(&episodes, &AnalysisConfig::default());
        assert_eq!(summary.peak_hour, 8);
    }
}
