use crate::models::{InterventionLevel, UsagePattern};

/// Render the fixed template for `level` with the window's statistics.
pub fn render_message(level: InterventionLevel, pattern: &UsagePattern) -> String {
    let pickups = pattern.pickup_count;
    let minutes = pattern.screen_time_minutes();
    match level {
        InterventionLevel::AwarenessNudge => format!(
            "You've picked up your phone {pickups} times in the last hour ({minutes} min). Still what you want to be doing?"
        ),
        InterventionLevel::FrictionDelay => {
            "Take a breath. This app will open in 10 seconds.".to_string()
        }
        InterventionLevel::ReflectionPrompt => {
            "What are you hoping to do right now? Name your intention before you continue."
                .to_string()
        }
        InterventionLevel::UsageSummary => format!(
            "So far: {pickups} pickups and {minutes} min of screen time this hour. Your focus commitment is still running."
        ),
        InterventionLevel::SoftLock => {
            "Distracting apps are locked for the next 5 minutes. You can do this.".to_string()
        }
        InterventionLevel::FullLock => {
            "Apps are locked until your focus session ends.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_interpolate_pattern_stats() {
        let pattern = UsagePattern {
            pickup_count: 12,
            total_screen_time_secs: 1530,
            ..UsagePattern::empty()
        };
        let nudge = render_message(InterventionLevel::AwarenessNudge, &pattern);
        assert!(nudge.contains("12 times"));
        assert!(nudge.contains("26 min"));

        let summary = render_message(InterventionLevel::UsageSummary, &pattern);
        assert!(summary.contains("12 pickups"));

        for level in InterventionLevel::ALL {
            assert!(!render_message(level, &pattern).is_empty());
        }
    }
}
