use chrono::{DateTime, Utc};

use crate::models::{
    AdaptationState, ArmEstimate, BanditArm, InterventionLevel, UsageContext,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Fresh state: one uniform-prior arm per interveneable context and bandit level.
pub fn initialize_adaptation() -> AdaptationState {
    let arms = UsageContext::INTERVENEABLE
        .into_iter()
        .flat_map(|context| {
            InterventionLevel::BANDIT_LEVELS
                .into_iter()
                .map(move |level| BanditArm::new(context, level))
        })
        .collect();

    AdaptationState {
        arms,
        suppressed_contexts: Vec::new(),
        quiet_hours: Vec::new(),
        total_interventions: 0,
        total_feedback: 0,
        last_updated: None,
    }
}

/// Record one Bernoulli outcome for the (context, level) arm, returning new state.
///
/// Counters advance even when no arm matches, which happens for levels only the
/// graduated ladder produces.
pub fn update_adaptation(
    state: &AdaptationState,
    context: UsageContext,
    level: InterventionLevel,
    success: bool,
    at: DateTime<Utc>,
) -> AdaptationState {
    let mut matched = false;
    let arms = state
        .arms
        .iter()
        .map(|arm| {
            if !arm.matches(context, level) {
                return arm.clone();
            }
            matched = true;
            let mut updated = arm.clone();
            if success {
                updated.alpha += 1.0;
            } else {
                updated.beta += 1.0;
            }
            updated.pulls += 1;
            updated
        })
        .collect();

    if matched {
        log_info!(
            "bandit arm {}/{} updated (success={})",
            context.as_str(),
            level.as_str(),
            success
        );
    } else {
        log_warn!(
            "no bandit arm for {}/{}; only counters updated",
            context.as_str(),
            level.as_str()
        );
    }

    AdaptationState {
        arms,
        total_interventions: state.total_interventions + 1,
        total_feedback: state.total_feedback + 1,
        last_updated: Some(at),
        ..state.clone()
    }
}

pub fn get_arm_estimates(state: &AdaptationState) -> Vec<ArmEstimate> {
    state
        .arms
        .iter()
        .map(|arm| ArmEstimate {
            context: arm.context,
            level: arm.level,
            estimated_success_rate: arm.alpha / (arm.alpha + arm.beta),
            confidence: 1.0 - 1.0 / f64::from(arm.pulls + 1).sqrt(),
            pulls: arm.pulls,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_sixteen_uniform_arms() {
        let state = initialize_adaptation();
        assert_eq!(state.arms.len(), 16);
        for arm in &state.arms {
            assert_eq!(arm.alpha, 1.0);
            assert_eq!(arm.beta, 1.0);
            assert_eq!(arm.pulls, 0);
            assert!(UsageContext::INTERVENEABLE.contains(&arm.context));
            assert!(InterventionLevel::BANDIT_LEVELS.contains(&arm.level));
        }
        assert!(state.suppressed_contexts.is_empty());
        assert!(state.quiet_hours.is_empty());
        assert_eq!(state.total_interventions, 0);
        assert_eq!(state.total_feedback, 0);
    }

    #[test]
    fn update_touches_only_the_target_arm() {
        let state = initialize_adaptation();
        let now = Utc::now();
        let next = update_adaptation(
            &state,
            UsageContext::AnxietyCheck,
            InterventionLevel::FrictionDelay,
            false,
            now,
        );

        for (before, after) in state.arms.iter().zip(&next.arms) {
            if before.matches(UsageContext::AnxietyCheck, InterventionLevel::FrictionDelay) {
                assert_eq!(after.pulls, before.pulls + 1);
                assert_eq!(after.beta, before.beta + 1.0);
                assert_eq!(after.alpha, before.alpha);
            } else {
                assert_eq!(after, before);
            }
        }
        assert_eq!(next.total_interventions, 1);
        assert_eq!(next.total_feedback, 1);
        assert_eq!(next.last_updated, Some(now));
        // The input snapshot is unchanged.
        assert_eq!(state, initialize_adaptation());
    }

    #[test]
    fn unmatched_update_only_moves_counters() {
        let state = initialize_adaptation();
        let next = update_adaptation(
            &state,
            UsageContext::BoredomHabit,
            InterventionLevel::UsageSummary,
            true,
            Utc::now(),
        );
        assert_eq!(next.arms, state.arms);
        assert_eq!(next.total_feedback, 1);
    }

    #[test]
    fn estimates_follow_beta_mean() {
        let mut state = initialize_adaptation();
        let now = Utc::now();
        for success in [true, true, true, false] {
            state = update_adaptation(
                &state,
                UsageContext::BoredomHabit,
                InterventionLevel::AwarenessNudge,
                success,
                now,
            );
        }
        let estimate = get_arm_estimates(&state)
            .into_iter()
            .find(|e| {
                e.context == UsageContext::BoredomHabit
                    && e.level == InterventionLevel::AwarenessNudge
            })
            .expect("arm present");
        assert!((estimate.estimated_success_rate - 4.0 / 6.0).abs() < 1e-12);
        assert!((estimate.confidence - (1.0 - 1.0 / 5f64.sqrt())).abs() < 1e-12);
        assert_eq!(estimate.pulls, 4);
    }
}
