//! Usage episode data model.
//!
//! An episode is one contiguous span of phone usage reported by the usage event source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::UsageContext;

/// Coarse app classification supplied by the usage event source.
///
/// Declaration order doubles as the tie-break order wherever categories are ranked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    SocialMedia,
    Messaging,
    Entertainment,
    Productivity,
    Utility,
    Health,
    Education,
    Unknown,
}

impl AppCategory {
    pub const ALL: [AppCategory; 8] = [
        AppCategory::SocialMedia,
        AppCategory::Messaging,
        AppCategory::Entertainment,
        AppCategory::Productivity,
        AppCategory::Utility,
        AppCategory::Health,
        AppCategory::Education,
        AppCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppCategory::SocialMedia => "social_media",
            AppCategory::Messaging => "messaging",
            AppCategory::Entertainment => "entertainment",
            AppCategory::Productivity => "productivity",
            AppCategory::Utility => "utility",
            AppCategory::Health => "health",
            AppCategory::Education => "education",
            AppCategory::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageEpisode {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_secs: i64,
    pub app_category: AppCategory,
    pub in_focus_session: bool,
    /// Set by the platform when a notification caused the pickup. Never inferred.
    #[serde(default)]
    pub notification_triggered: bool,
    pub classified_context: UsageContext,
    pub user_corrected_context: Option<UsageContext>,
}

impl UsageEpisode {
    /// Builds an unclassified episode; duration is derived from the span and never negative.
    pub fn new(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        app_category: AppCategory,
        in_focus_session: bool,
        notification_triggered: bool,
    ) -> Self {
        let duration_secs = (end_time - start_time).num_seconds().max(0);
        Self {
            id: id.into(),
            start_time,
            end_time,
            duration_secs,
            app_category,
            in_focus_session,
            notification_triggered,
            classified_context: UsageContext::Unknown,
            user_corrected_context: None,
        }
    }
}
