use crate::models::{AppCategory, ContextFeatures, ContextWeights, FeatureIndicator, UsageContext};

use FeatureIndicator::*;

/// Additive scoring rules: a context gains the weight when the indicator is active.
const RULES: &[(UsageContext, FeatureIndicator, f64)] = &[
    (UsageContext::IntentionalTask, AppProductivity, 0.4),
    (UsageContext::IntentionalTask, AppUtility, 0.3),
    (UsageContext::IntentionalTask, DurationUnder60s, 0.2),
    (UsageContext::IntentionalTask, GapOver1800s, 0.2),
    (UsageContext::WorkBreak, WorkHours, 0.2),
    (UsageContext::WorkBreak, FewRecentPickups, 0.2),
    (UsageContext::WorkBreak, DurationShortBrowse, 0.3),
    (UsageContext::WorkBreak, AppSocialMedia, 0.15),
    (UsageContext::WorkBreak, AppEntertainment, 0.15),
    (UsageContext::SocialResponse, NotificationTriggered, 0.4),
    (UsageContext::SocialResponse, AppMessaging, 0.35),
    (UsageContext::SocialResponse, DurationUnder90s, 0.15),
    (UsageContext::BoredomHabit, GapUnder300s, 0.35),
    (UsageContext::BoredomHabit, AppSocialMedia, 0.3),
    (UsageContext::BoredomHabit, AppEntertainment, 0.2),
    (UsageContext::BoredomHabit, ManyRecentPickups, 0.25),
    (UsageContext::BoredomHabit, NoNotification, 0.1),
    (UsageContext::BoredomHabit, GapBelowHourlyAverage, 0.2),
    (UsageContext::AnxietyCheck, DurationUnder15s, 0.35),
    (UsageContext::AnxietyCheck, RapidRepeatPickups, 0.3),
    (UsageContext::AnxietyCheck, InFocusSession, 0.25),
    (UsageContext::TransitionMoment, TransitionHours, 0.25),
    (UsageContext::TransitionMoment, GapModerate, 0.2),
    (UsageContext::TransitionMoment, DurationMediumBrowse, 0.15),
];

impl FeatureIndicator {
    pub fn is_active(&self, f: &ContextFeatures) -> bool {
        let gap = f.time_since_last_pickup_secs;
        let duration = f.current_duration_secs;
        let hour = f.hour_of_day;
        match self {
            AppProductivity => f.app_category == AppCategory::Productivity,
            AppUtility => f.app_category == AppCategory::Utility,
            AppSocialMedia => f.app_category == AppCategory::SocialMedia,
            AppEntertainment => f.app_category == AppCategory::Entertainment,
            AppMessaging => f.app_category == AppCategory::Messaging,
            DurationUnder15s => duration < 15.0,
            DurationUnder60s => duration < 60.0,
            DurationUnder90s => duration < 90.0,
            DurationShortBrowse => (60.0..=300.0).contains(&duration),
            DurationMediumBrowse => duration > 30.0 && duration < 180.0,
            GapUnder300s => gap < 300.0,
            GapOver1800s => gap > 1800.0,
            GapModerate => (600.0..=3600.0).contains(&gap),
            GapBelowHourlyAverage => gap < f.avg_pickup_interval_for_hour * 0.5,
            RapidRepeatPickups => gap < 180.0 && f.recent_pickup_count > 4,
            NotificationTriggered => f.notification_triggered,
            NoNotification => !f.notification_triggered,
            FewRecentPickups => f.recent_pickup_count < 4,
            ManyRecentPickups => f.recent_pickup_count > 6,
            InFocusSession => f.in_focus_session,
            WorkHours => (9..=17).contains(&hour),
            TransitionHours => (7..=9).contains(&hour) || (16..=18).contains(&hour),
        }
    }
}

/// Indicators that hold for `features`, in declaration order.
pub fn active_indicators(features: &ContextFeatures) -> Vec<FeatureIndicator> {
    FeatureIndicator::ALL
        .into_iter()
        .filter(|indicator| indicator.is_active(features))
        .collect()
}

/// Raw, floored scores in `UsageContext::ALL` order.
pub fn score_contexts(
    features: &ContextFeatures,
    weights: Option<&ContextWeights>,
    unknown_baseline: f64,
) -> [f64; 7] {
    let active = active_indicators(features);
    let mut scores = [0.0; 7];

    for (idx, context) in UsageContext::ALL.into_iter().enumerate() {
        let base: f64 = if context == UsageContext::Unknown {
            unknown_baseline
        } else {
            RULES
                .iter()
                .filter(|(rule_context, indicator, _)| {
                    *rule_context == context && active.contains(indicator)
                })
                .map(|(_, _, weight)| weight)
                .sum()
        };

        let learned: f64 = weights
            .map(|w| active.iter().map(|ind| w.adjustment(context, *ind)).sum())
            .unwrap_or(0.0);

        scores[idx] = (base + learned).max(0.0);
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> ContextFeatures {
        ContextFeatures {
            time_since_last_pickup_secs: 3600.0,
            hour_of_day: 12,
            notification_triggered: false,
            current_duration_secs: 120.0,
            app_category: AppCategory::Unknown,
            recent_pickup_count: 5,
            in_focus_session: false,
            day_of_week: 3,
            avg_pickup_interval_for_hour: 900.0,
        }
    }

    fn score_of(scores: &[f64; 7], context: UsageContext) -> f64 {
        scores[context as usize]
    }

    #[test]
    fn social_response_rules() {
        let f = ContextFeatures {
            notification_triggered: true,
            app_category: AppCategory::Messaging,
            current_duration_secs: 20.0,
            ..features()
        };
        let scores = score_contexts(&f, None, 0.1);
        assert!((score_of(&scores, UsageContext::SocialResponse) - 0.9).abs() < 1e-9);
        assert!((score_of(&scores, UsageContext::Unknown) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn anxiety_needs_both_gap_and_pickups() {
        let base = ContextFeatures {
            time_since_last_pickup_secs: 100.0,
            current_duration_secs: 40.0,
            ..features()
        };
        let with_pickups = score_contexts(&base, None, 0.1);
        assert!((score_of(&with_pickups, UsageContext::AnxietyCheck) - 0.3).abs() < 1e-9);

        let few = ContextFeatures {
            recent_pickup_count: 4,
            ..base
        };
        let without = score_contexts(&few, None, 0.1);
        assert_eq!(score_of(&without, UsageContext::AnxietyCheck), 0.0);
    }

    #[test]
    fn hour_buckets_are_inclusive() {
        let at_nine = ContextFeatures {
            hour_of_day: 9,
            ..features()
        };
        assert!(WorkHours.is_active(&at_nine));
        assert!(TransitionHours.is_active(&at_nine));

        let at_eighteen = ContextFeatures {
            hour_of_day: 18,
            ..features()
        };
        assert!(!WorkHours.is_active(&at_eighteen));
        assert!(TransitionHours.is_active(&at_eighteen));
    }

    #[test]
    fn learned_adjustments_are_floored_at_zero() {
        let mut weights = ContextWeights::new();
        weights
            .adjustments
            .entry(UsageContext::Unknown)
            .or_default()
            .insert(NoNotification, -5.0);
        let scores = score_contexts(&features(), Some(&weights), 0.1);
        assert_eq!(score_of(&scores, UsageContext::Unknown), 0.0);
    }

    #[test]
    fn every_rule_indicator_is_listed() {
        for (_, indicator, _) in RULES {
            assert!(FeatureIndicator::ALL.contains(indicator));
        }
    }
}
