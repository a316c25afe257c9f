use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{AppCategory, InterventionLevel, InterventionOutcome, UsageContext};

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_context(value: &str) -> Result<UsageContext> {
    UsageContext::parse(value).ok_or_else(|| anyhow!("unknown usage context {value}"))
}

pub fn parse_optional_context(value: Option<String>) -> Result<Option<UsageContext>> {
    value.as_deref().map(parse_context).transpose()
}

pub fn parse_category(value: &str) -> Result<AppCategory> {
    AppCategory::parse(value).ok_or_else(|| anyhow!("unknown app category {value}"))
}

pub fn parse_level(value: &str) -> Result<InterventionLevel> {
    InterventionLevel::parse(value).ok_or_else(|| anyhow!("unknown intervention level {value}"))
}

pub fn parse_outcome(value: &str) -> Result<InterventionOutcome> {
    InterventionOutcome::parse(value)
        .ok_or_else(|| anyhow!("unknown intervention outcome {value}"))
}
