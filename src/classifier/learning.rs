use crate::classifier::scoring::active_indicators;
use crate::models::{ContextFeatures, ContextWeights, UsageContext};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Apply one user correction, returning new weights. `weights` is left untouched.
///
/// The corrected context gains `learning_rate` per active indicator; the predicted one
/// loses `learning_rate * penalty_factor`.
pub fn update_weights_from_feedback(
    weights: &ContextWeights,
    features: &ContextFeatures,
    predicted_context: UsageContext,
    corrected_context: UsageContext,
    learning_rate: f64,
    penalty_factor: f64,
) -> ContextWeights {
    let mut next = weights.clone();
    let active = active_indicators(features);

    for indicator in &active {
        *next
            .adjustments
            .entry(corrected_context)
            .or_default()
            .entry(*indicator)
            .or_insert(0.0) += learning_rate;
        *next
            .adjustments
            .entry(predicted_context)
            .or_default()
            .entry(*indicator)
            .or_insert(0.0) -= learning_rate * penalty_factor;
    }
    next.correction_count += 1;

    log_info!(
        "context correction #{}: {} -> {} across {} indicators",
        next.correction_count,
        predicted_context.as_str(),
        corrected_context.as_str(),
        active.len()
    );

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify_context, ClassifierConfig};
    use crate::models::{AppCategory, FeatureIndicator};

    fn features() -> ContextFeatures {
        ContextFeatures {
            time_since_last_pickup_secs: 2400.0,
            hour_of_day: 13,
            notification_triggered: false,
            current_duration_secs: 200.0,
            app_category: AppCategory::Entertainment,
            recent_pickup_count: 1,
            in_focus_session: false,
            day_of_week: 4,
            avg_pickup_interval_for_hour: 900.0,
        }
    }

    #[test]
    fn correction_count_increments_and_input_is_untouched() {
        let original = ContextWeights::new();
        let snapshot = original.clone();

        let updated = update_weights_from_feedback(
            &original,
            &features(),
            UsageContext::WorkBreak,
            UsageContext::BoredomHabit,
            0.05,
            0.5,
        );
        assert_eq!(updated.correction_count, 1);
        assert_eq!(original, snapshot);

        let twice = update_weights_from_feedback(
            &updated,
            &features(),
            UsageContext::WorkBreak,
            UsageContext::BoredomHabit,
            0.05,
            0.5,
        );
        assert_eq!(twice.correction_count, 2);
        assert_eq!(updated.correction_count, 1);
    }

    #[test]
    fn updates_are_asymmetric_over_active_indicators() {
        let updated = update_weights_from_feedback(
            &ContextWeights::new(),
            &features(),
            UsageContext::WorkBreak,
            UsageContext::BoredomHabit,
            0.05,
            0.5,
        );

        let entertainment = FeatureIndicator::AppEntertainment;
        let boosted = updated.adjustment(UsageContext::BoredomHabit, entertainment);
        let penalised = updated.adjustment(UsageContext::WorkBreak, entertainment);
        assert!((boosted - 0.05).abs() < 1e-12);
        assert!((penalised + 0.025).abs() < 1e-12);

        // Inactive indicators are not touched.
        let messaging = FeatureIndicator::AppMessaging;
        assert_eq!(updated.adjustment(UsageContext::BoredomHabit, messaging), 0.0);
        assert_eq!(updated.adjustment(UsageContext::SocialResponse, entertainment), 0.0);
    }

    #[test]
    fn repeated_corrections_flip_the_prediction() {
        let config = ClassifierConfig::default();
        let features = features();
        let before = classify_context(&features, None, &config);
        assert_eq!(before.context, UsageContext::WorkBreak);

        let mut weights = ContextWeights::new();
        for _ in 0..10 {
            weights = update_weights_from_feedback(
                &weights,
                &features,
                before.context,
                UsageContext::BoredomHabit,
                config.learning_rate,
                config.penalty_factor,
            );
        }
        let after = classify_context(&features, Some(&weights), &config);
        assert_eq!(after.context, UsageContext::BoredomHabit);
        assert_eq!(weights.correction_count, 10);
    }

    #[test]
    fn penalty_factor_scales_only_the_predicted_context() {
        let config = ClassifierConfig {
            penalty_factor: 0.0,
            ..ClassifierConfig::default()
        };
        let updated = update_weights_from_feedback(
            &ContextWeights::new(),
            &features(),
            UsageContext::WorkBreak,
            UsageContext::BoredomHabit,
            config.learning_rate,
            config.penalty_factor,
        );

        let entertainment = FeatureIndicator::AppEntertainment;
        let boosted = updated.adjustment(UsageContext::BoredomHabit, entertainment);
        assert_eq!(updated.adjustment(UsageContext::WorkBreak, entertainment), 0.0);
        assert!((boosted - 0.05).abs() < 1e-12);
    }
}
