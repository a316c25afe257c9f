use crate::feedback::coordinator::is_success;
use crate::feedback::types::{AdaptationMetrics, AdaptationPhase};
use crate::models::FeedbackRecord;

const LEARNING_MIN_FEEDBACK: u32 = 10;
const ADAPTING_CORRECTION_RATE: f64 = 0.2;
const NOTABLE_IMPROVEMENT: f64 = 0.1;

/// Analytics over a chronological feedback history.
pub fn compute_adaptation_metrics(history: &[FeedbackRecord]) -> AdaptationMetrics {
    if history.is_empty() {
        return AdaptationMetrics::default();
    }

    let total = history.len();
    let helpful = history.iter().filter(|r| r.feedback.helpful).count();
    let corrections = history
        .iter()
        .filter(|r| r.feedback.context_correct == Some(false))
        .count();

    let (earlier, later) = history.split_at(total / 2);
    let outcome_improvement = positive_rate(later) - positive_rate(earlier);

    let total_feedback = total as u32;
    let context_correction_rate = corrections as f64 / total as f64;
    let adaptation_phase = if total_feedback < LEARNING_MIN_FEEDBACK {
        AdaptationPhase::Learning
    } else if context_correction_rate > ADAPTING_CORRECTION_RATE {
        AdaptationPhase::Adapting
    } else {
        AdaptationPhase::Stable
    };

    AdaptationMetrics {
        total_feedback,
        helpful_rate: helpful as f64 / total as f64,
        context_correction_rate,
        outcome_improvement,
        adaptation_phase,
    }
}

fn positive_rate(records: &[FeedbackRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let positive = records
        .iter()
        .filter(|r| is_success(&r.feedback, r.outcome))
        .count();
    positive as f64 / records.len() as f64
}

/// Short user-facing narrative for the metrics.
pub fn generate_adaptation_summary(metrics: &AdaptationMetrics) -> String {
    let improvement_points = (metrics.outcome_improvement * 100.0).round();
    let trend = if metrics.outcome_improvement >= NOTABLE_IMPROVEMENT {
        format!(" Nudges are landing {improvement_points:.0}% more often than when we started.")
    } else if metrics.outcome_improvement <= -NOTABLE_IMPROVEMENT {
        format!(
            " Nudges have been landing {:.0}% less often lately, so we're trying new approaches.",
            improvement_points.abs()
        )
    } else {
        String::new()
    };

    match metrics.adaptation_phase {
        AdaptationPhase::Learning => {
            let remaining = LEARNING_MIN_FEEDBACK.saturating_sub(metrics.total_feedback);
            format!(
                "Still learning your habits. {remaining} more responses will help tailor your nudges.{trend}"
            )
        }
        AdaptationPhase::Adapting => format!(
            "Adapting to you: {:.0}% of recent pickups were labelled differently than we guessed, and we're adjusting.{trend}",
            metrics.context_correction_rate * 100.0
        ),
        AdaptationPhase::Stable => format!(
            "Your nudges are tuned. {:.0}% of them have been helpful.{trend}",
            metrics.helpful_rate * 100.0
        ),
    }
}
