use crate::intervention::config::SelectorConfig;
use crate::models::{InterventionLevel, UsagePattern};

/// Deterministic fallback used before the bandit has arms for a context, and as the
/// ceiling when the safety clamp rejects a bandit pick.
pub fn graduated_response(
    pattern: &UsagePattern,
    in_focus_session: bool,
    config: &SelectorConfig,
) -> InterventionLevel {
    if in_focus_session {
        if pattern.compulsiveness_score > config.focus_soft_lock_compulsiveness {
            InterventionLevel::SoftLock
        } else if pattern.pickup_frequency > config.focus_reflection_frequency {
            InterventionLevel::ReflectionPrompt
        } else {
            InterventionLevel::FrictionDelay
        }
    } else if pattern.compulsiveness_score > config.reflection_compulsiveness {
        InterventionLevel::ReflectionPrompt
    } else if pattern.pickup_frequency > config.usage_summary_frequency {
        InterventionLevel::UsageSummary
    } else if pattern.pickup_frequency > config.friction_delay_frequency {
        InterventionLevel::FrictionDelay
    } else {
        InterventionLevel::AwarenessNudge
    }
}
