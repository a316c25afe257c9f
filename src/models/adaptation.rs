use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::UsageContext;
use super::intervention::InterventionLevel;

/// A (context, level) pair with a Beta(alpha, beta) belief over its success rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BanditArm {
    pub context: UsageContext,
    pub level: InterventionLevel,
    pub alpha: f64,
    pub beta: f64,
    pub pulls: u32,
}

impl BanditArm {
    /// Uniform Beta(1, 1) prior.
    pub fn new(context: UsageContext, level: InterventionLevel) -> Self {
        Self {
            context,
            level,
            alpha: 1.0,
            beta: 1.0,
            pulls: 0,
        }
    }

    pub fn matches(&self, context: UsageContext, level: InterventionLevel) -> bool {
        self.context == context && self.level == level
    }
}

/// Hours of the day, `[start_hour, end_hour)`, during which nothing is delivered.
///
/// Wraps past midnight when `start_hour > end_hour`; empty when they are equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl QuietHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Externally owned bandit state. Every update returns a new value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationState {
    pub arms: Vec<BanditArm>,
    pub suppressed_contexts: Vec<UsageContext>,
    pub quiet_hours: Vec<QuietHours>,
    pub total_interventions: u64,
    pub total_feedback: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl AdaptationState {
    pub fn is_suppressed(&self, context: UsageContext) -> bool {
        self.suppressed_contexts.contains(&context)
    }

    pub fn is_quiet_hour(&self, hour: u32) -> bool {
        self.quiet_hours.iter().any(|window| window.contains(hour))
    }

    pub fn arms_for(&self, context: UsageContext) -> impl Iterator<Item = &BanditArm> {
        self.arms.iter().filter(move |arm| arm.context == context)
    }

    pub fn arm(&self, context: UsageContext, level: InterventionLevel) -> Option<&BanditArm> {
        self.arms.iter().find(|arm| arm.matches(context, level))
    }

    /// Opts the user out of interventions for `context`.
    pub fn with_suppressed_context(&self, context: UsageContext) -> Self {
        let mut next = self.clone();
        if !next.suppressed_contexts.contains(&context) {
            next.suppressed_contexts.push(context);
        }
        next
    }

    pub fn without_suppressed_context(&self, context: UsageContext) -> Self {
        let mut next = self.clone();
        next.suppressed_contexts.retain(|suppressed| *suppressed != context);
        next
    }

    pub fn with_quiet_hours(&self, quiet_hours: Vec<QuietHours>) -> Self {
        Self {
            quiet_hours,
            ..self.clone()
        }
    }
}

/// Read-only view of one arm for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArmEstimate {
    pub context: UsageContext,
    pub level: InterventionLevel,
    pub estimated_success_rate: f64,
    /// Monotonic in pulls; not a statistical interval.
    pub confidence: f64,
    pub pulls: u32,
}
