use crate::analysis::hourly_average_intervals;
use crate::classifier::{extract_features, update_weights_from_feedback, ClassifierConfig};
use crate::feedback::types::FeedbackResult;
use crate::intervention::update_adaptation;
use crate::models::{
    AdaptationState, ContextWeights, Intervention, InterventionFeedback, InterventionOutcome,
    UsageContext, UsageEpisode,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// A delivered intervention counts as a success if the user found it helpful or
/// usage stopped or dropped afterwards.
pub fn is_success(feedback: &InterventionFeedback, outcome: InterventionOutcome) -> bool {
    feedback.helpful || outcome.is_positive()
}

/// The corrected context, if the feedback disagrees with the classification.
pub fn correction_for(
    feedback: &InterventionFeedback,
    episode: &UsageEpisode,
) -> Option<UsageContext> {
    match (feedback.context_correct, feedback.corrected_context) {
        (Some(false), Some(corrected)) if corrected != episode.classified_context => {
            Some(corrected)
        }
        _ => None,
    }
}

/// Fold one piece of user feedback into the classifier and the bandit.
///
/// Holds no state and does not guard against repeated submissions; the engine does.
#[allow(clippy::too_many_arguments)]
pub fn process_feedback(
    intervention: &Intervention,
    feedback: &InterventionFeedback,
    outcome: InterventionOutcome,
    episode: &UsageEpisode,
    recent_episodes: &[UsageEpisode],
    classifier_weights: &ContextWeights,
    adaptation_state: &AdaptationState,
    config: &ClassifierConfig,
) -> FeedbackResult {
    let acknowledged = Intervention {
        acknowledged: true,
        feedback: Some(feedback.clone()),
        outcome: Some(outcome),
        ..intervention.clone()
    };

    let (weights, weights_updated) = match correction_for(feedback, episode) {
        Some(corrected) => {
            let intervals = hourly_average_intervals(recent_episodes);
            let features = extract_features(episode, recent_episodes, Some(&intervals), config);
            let weights = update_weights_from_feedback(
                classifier_weights,
                &features,
                episode.classified_context,
                corrected,
                config.learning_rate,
                config.penalty_factor,
            );
            (weights, true)
        }
        None => (classifier_weights.clone(), false),
    };

    let success = is_success(feedback, outcome);
    let adaptation = update_adaptation(
        adaptation_state,
        episode.classified_context,
        intervention.level,
        success,
        feedback.timestamp,
    );

    log_info!(
        "feedback for intervention {}: outcome={} success={} corrected={}",
        intervention.id,
        outcome.as_str(),
        success,
        weights_updated
    );

    FeedbackResult {
        intervention: acknowledged,
        weights,
        adaptation,
        success,
        weights_updated,
    }
}
