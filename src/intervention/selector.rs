use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::intervention::config::SelectorConfig;
use crate::intervention::ladder::graduated_response;
use crate::intervention::messages::render_message;
use crate::intervention::sampling::sample_beta;
use crate::models::{
    AdaptationState, Intervention, InterventionLevel, UsageContext, UsagePattern,
};
use crate::utils::time::local_hour;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// What the focus session service reports at decision time.
#[derive(Debug, Clone, Copy)]
pub struct FocusSnapshot {
    pub in_focus_session: bool,
    pub now: DateTime<Utc>,
}

/// Decide whether to intervene for a classified pickup and build the intervention.
pub fn select_intervention<R: Rng + ?Sized>(
    context: UsageContext,
    pattern: &UsagePattern,
    state: &AdaptationState,
    episode_id: &str,
    focus: FocusSnapshot,
    config: &SelectorConfig,
    rng: &mut R,
) -> Option<Intervention> {
    if state.is_suppressed(context) {
        log_info!("skipping intervention: {} is suppressed", context.as_str());
        return None;
    }

    let hour = local_hour(&focus.now);
    if state.is_quiet_hour(hour) {
        log_info!("skipping intervention: hour {hour} is quiet");
        return None;
    }

    if context.is_legitimate_use() && !focus.in_focus_session {
        log_debug!("no intervention for {} outside a focus session", context.as_str());
        return None;
    }

    let level = select_level(context, pattern, state, focus.in_focus_session, config, rng);
    let intervention = Intervention {
        id: Uuid::new_v4().to_string(),
        timestamp: focus.now,
        level,
        episode_id: episode_id.to_string(),
        message: render_message(level, pattern),
        acknowledged: false,
        feedback: None,
        outcome: None,
    };

    log_info!(
        "intervention {} for {}: {}",
        intervention.id,
        context.as_str(),
        level.as_str()
    );
    Some(intervention)
}

/// Thompson-sample among the context's arms, falling back to the graduated ladder
/// when the context has no arms or the pick is too intrusive for the evidence.
pub fn select_level<R: Rng + ?Sized>(
    context: UsageContext,
    pattern: &UsagePattern,
    state: &AdaptationState,
    in_focus_session: bool,
    config: &SelectorConfig,
    rng: &mut R,
) -> InterventionLevel {
    let mut best: Option<(InterventionLevel, f64)> = None;
    for arm in state.arms_for(context) {
        let sample = sample_beta(rng, arm.alpha, arm.beta);
        match best {
            Some((_, best_sample)) if best_sample >= sample => {}
            _ => best = Some((arm.level, sample)),
        }
    }

    let Some((level, sample)) = best else {
        return graduated_response(pattern, in_focus_session, config);
    };

    if pattern.compulsiveness_score < config.safety_compulsiveness
        && level.rank() > config.safety_max_rank
    {
        let fallback = graduated_response(pattern, in_focus_session, config);
        log_debug!(
            "safety clamp: bandit picked {} at low compulsiveness {:.2}, using {}",
            level.as_str(),
            pattern.compulsiveness_score,
            fallback.as_str()
        );
        return fallback;
    }

    log_debug!("bandit picked {} (sample {:.3})", level.as_str(), sample);
    level
}
