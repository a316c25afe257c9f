use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Uuid;

use crate::models::{AppCategory, UsageEpisode};

use super::source::UsageEventSource;

/// Category mix of a typical day, weighted toward social and messaging apps.
const CATEGORY_WEIGHTS: &[(AppCategory, u32)] = &[
    (AppCategory::SocialMedia, 30),
    (AppCategory::Messaging, 25),
    (AppCategory::Entertainment, 15),
    (AppCategory::Productivity, 10),
    (AppCategory::Utility, 8),
    (AppCategory::Health, 5),
    (AppCategory::Education, 4),
    (AppCategory::Unknown, 3),
];

/// One synthetic pickup starting at `start`.
pub fn simulate_usage_episode<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    in_focus_session: bool,
) -> UsageEpisode {
    let category = CATEGORY_WEIGHTS
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(category, _)| *category)
        .unwrap_or(AppCategory::Unknown);

    // Mostly quick checks with a tail of longer sessions.
    let duration_secs = if rng.gen_bool(0.6) {
        rng.gen_range(3..30)
    } else {
        rng.gen_range(30..600)
    };
    let notification_triggered = (category == AppCategory::Messaging && rng.gen_bool(0.7))
        || rng.gen_bool(0.1);

    UsageEpisode::new(
        Uuid::new_v4().to_string(),
        start,
        start + Duration::seconds(duration_secs),
        category,
        in_focus_session,
        notification_triggered,
    )
}

/// `count` pickups spread over the 16 waking hours after `day_start`, oldest first.
pub fn simulate_day_history<R: Rng + ?Sized>(
    rng: &mut R,
    day_start: DateTime<Utc>,
    count: usize,
) -> Vec<UsageEpisode> {
    let waking_start = day_start + Duration::hours(7);
    let mut offsets: Vec<i64> = (0..count).map(|_| rng.gen_range(0..16 * 3600)).collect();
    offsets.sort_unstable();

    offsets
        .into_iter()
        .map(|offset| {
            let start = waking_start + Duration::seconds(offset);
            simulate_usage_episode(rng, start, false)
        })
        .collect()
}

/// Replays a pre-generated history, a batch per poll.
pub struct SimulatedUsageSource {
    pending: Vec<UsageEpisode>,
    batch_size: usize,
}

impl SimulatedUsageSource {
    pub fn from_day(seed: u64, day_start: DateTime<Utc>, count: usize, batch_size: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_episodes(simulate_day_history(&mut rng, day_start, count), batch_size)
    }

    pub fn from_episodes(mut episodes: Vec<UsageEpisode>, batch_size: usize) -> Self {
        episodes.reverse();
        Self {
            pending: episodes,
            batch_size: batch_size.max(1),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl UsageEventSource for SimulatedUsageSource {
    fn poll_episodes(&mut self) -> Vec<UsageEpisode> {
        let take = self.batch_size.min(self.pending.len());
        (0..take).filter_map(|_| self.pending.pop()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_seed_same_day_shape() {
        let day = Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap();
        let a = simulate_day_history(&mut StdRng::seed_from_u64(1), day, 40);
        let b = simulate_day_history(&mut StdRng::seed_from_u64(1), day, 40);

        assert_eq!(a.len(), 40);
        let shape = |episodes: &[UsageEpisode]| {
            episodes
                .iter()
                .map(|e| (e.start_time, e.duration_secs, e.app_category))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&a), shape(&b));
        assert!(a.windows(2).all(|pair| pair[0].start_time <= pair[1].start_time));
        for episode in &a {
            assert!(episode.start_time >= day + Duration::hours(7));
            assert!(episode.start_time < day + Duration::hours(23));
            assert!((3..600).contains(&episode.duration_secs));
        }
    }

    #[test]
    fn source_replays_in_batches() {
        let day = Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap();
        let mut source = SimulatedUsageSource::from_day(3, day, 5, 2);

        let first = source.poll_episodes();
        let second = source.poll_episodes();
        let third = source.poll_episodes();
        assert_eq!((first.len(), second.len(), third.len()), (2, 2, 1));
        assert!(first[1].start_time <= second[0].start_time);
        assert_eq!(source.remaining(), 0);
        assert!(source.poll_episodes().is_empty());
    }
}
