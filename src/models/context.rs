use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::episode::AppCategory;

/// The inferred reason a user picked up the phone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UsageContext {
    IntentionalTask,
    WorkBreak,
    SocialResponse,
    BoredomHabit,
    AnxietyCheck,
    TransitionMoment,
    Unknown,
}

impl UsageContext {
    pub const ALL: [UsageContext; 7] = [
        UsageContext::IntentionalTask,
        UsageContext::WorkBreak,
        UsageContext::SocialResponse,
        UsageContext::BoredomHabit,
        UsageContext::AnxietyCheck,
        UsageContext::TransitionMoment,
        UsageContext::Unknown,
    ];

    /// Contexts the bandit keeps arms for.
    pub const INTERVENEABLE: [UsageContext; 4] = [
        UsageContext::BoredomHabit,
        UsageContext::AnxietyCheck,
        UsageContext::TransitionMoment,
        UsageContext::SocialResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageContext::IntentionalTask => "intentional_task",
            UsageContext::WorkBreak => "work_break",
            UsageContext::SocialResponse => "social_response",
            UsageContext::BoredomHabit => "boredom_habit",
            UsageContext::AnxietyCheck => "anxiety_check",
            UsageContext::TransitionMoment => "transition_moment",
            UsageContext::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|context| context.as_str() == value)
    }

    /// Contexts that are left alone unless a focus session is running.
    pub fn is_legitimate_use(&self) -> bool {
        matches!(self, UsageContext::IntentionalTask | UsageContext::WorkBreak)
    }
}

/// Stateless feature snapshot for one episode. Always recomputable, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextFeatures {
    pub time_since_last_pickup_secs: f64,
    pub hour_of_day: u32,
    pub notification_triggered: bool,
    pub current_duration_secs: f64,
    pub app_category: AppCategory,
    pub recent_pickup_count: u32,
    pub in_focus_session: bool,
    /// 0 = Sunday.
    pub day_of_week: u32,
    pub avg_pickup_interval_for_hour: f64,
}

/// Named boolean feature indicators shared by the scoring rules and weight learning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FeatureIndicator {
    AppProductivity,
    AppUtility,
    AppSocialMedia,
    AppEntertainment,
    AppMessaging,
    DurationUnder15s,
    DurationUnder60s,
    DurationUnder90s,
    /// 60 to 300 seconds.
    DurationShortBrowse,
    /// Strictly between 30 and 180 seconds.
    DurationMediumBrowse,
    GapUnder300s,
    GapOver1800s,
    /// 600 to 3600 seconds.
    GapModerate,
    /// Gap under half the historical average for this hour.
    GapBelowHourlyAverage,
    /// Gap under 180 seconds with more than 4 recent pickups.
    RapidRepeatPickups,
    NotificationTriggered,
    NoNotification,
    FewRecentPickups,
    ManyRecentPickups,
    InFocusSession,
    WorkHours,
    TransitionHours,
}

impl FeatureIndicator {
    pub const ALL: [FeatureIndicator; 22] = [
        FeatureIndicator::AppProductivity,
        FeatureIndicator::AppUtility,
        FeatureIndicator::AppSocialMedia,
        FeatureIndicator::AppEntertainment,
        FeatureIndicator::AppMessaging,
        FeatureIndicator::DurationUnder15s,
        FeatureIndicator::DurationUnder60s,
        FeatureIndicator::DurationUnder90s,
        FeatureIndicator::DurationShortBrowse,
        FeatureIndicator::DurationMediumBrowse,
        FeatureIndicator::GapUnder300s,
        FeatureIndicator::GapOver1800s,
        FeatureIndicator::GapModerate,
        FeatureIndicator::GapBelowHourlyAverage,
        FeatureIndicator::RapidRepeatPickups,
        FeatureIndicator::NotificationTriggered,
        FeatureIndicator::NoNotification,
        FeatureIndicator::FewRecentPickups,
        FeatureIndicator::ManyRecentPickups,
        FeatureIndicator::InFocusSession,
        FeatureIndicator::WorkHours,
        FeatureIndicator::TransitionHours,
    ];
}

/// Learned per-context, per-indicator score adjustments.
///
/// Updates always produce a new value; see `classifier::learning`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextWeights {
    pub adjustments: BTreeMap<UsageContext, BTreeMap<FeatureIndicator, f64>>,
    pub correction_count: u32,
}

impl ContextWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adjustment(&self, context: UsageContext, indicator: FeatureIndicator) -> f64 {
        self.adjustments
            .get(&context)
            .and_then(|by_indicator| by_indicator.get(&indicator))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub context: UsageContext,
    pub confidence: f64,
    pub probabilities: BTreeMap<UsageContext, f64>,
}
