use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::UsageContext;

/// Intervention intrusiveness, ordered from least to most intrusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InterventionLevel {
    AwarenessNudge,
    FrictionDelay,
    ReflectionPrompt,
    UsageSummary,
    SoftLock,
    FullLock,
}

impl InterventionLevel {
    pub const ALL: [InterventionLevel; 6] = [
        InterventionLevel::AwarenessNudge,
        InterventionLevel::FrictionDelay,
        InterventionLevel::ReflectionPrompt,
        InterventionLevel::UsageSummary,
        InterventionLevel::SoftLock,
        InterventionLevel::FullLock,
    ];

    /// Levels the bandit keeps arms for.
    pub const BANDIT_LEVELS: [InterventionLevel; 4] = [
        InterventionLevel::AwarenessNudge,
        InterventionLevel::FrictionDelay,
        InterventionLevel::ReflectionPrompt,
        InterventionLevel::SoftLock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionLevel::AwarenessNudge => "awareness_nudge",
            InterventionLevel::FrictionDelay => "friction_delay",
            InterventionLevel::ReflectionPrompt => "reflection_prompt",
            InterventionLevel::UsageSummary => "usage_summary",
            InterventionLevel::SoftLock => "soft_lock",
            InterventionLevel::FullLock => "full_lock",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }

    /// Position in the intrusiveness ordering, 0 = awareness_nudge.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionOutcome {
    StoppedUsage,
    ReducedUsage,
    ContinuedUsage,
    IncreasedUsage,
    UninstalledApp,
}

impl InterventionOutcome {
    pub const ALL: [InterventionOutcome; 5] = [
        InterventionOutcome::StoppedUsage,
        InterventionOutcome::ReducedUsage,
        InterventionOutcome::ContinuedUsage,
        InterventionOutcome::IncreasedUsage,
        InterventionOutcome::UninstalledApp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionOutcome::StoppedUsage => "stopped_usage",
            InterventionOutcome::ReducedUsage => "reduced_usage",
            InterventionOutcome::ContinuedUsage => "continued_usage",
            InterventionOutcome::IncreasedUsage => "increased_usage",
            InterventionOutcome::UninstalledApp => "uninstalled_app",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|outcome| outcome.as_str() == value)
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            InterventionOutcome::StoppedUsage | InterventionOutcome::ReducedUsage
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterventionFeedback {
    pub helpful: bool,
    pub context_correct: Option<bool>,
    pub corrected_context: Option<UsageContext>,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: InterventionLevel,
    pub episode_id: String,
    pub message: String,
    pub acknowledged: bool,
    pub feedback: Option<InterventionFeedback>,
    pub outcome: Option<InterventionOutcome>,
}

/// One entry of the chronological feedback history used for adaptation analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub feedback: InterventionFeedback,
    pub outcome: InterventionOutcome,
    pub timestamp: DateTime<Utc>,
}
