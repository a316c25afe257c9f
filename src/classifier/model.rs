use std::collections::{BTreeMap, HashMap};

use crate::classifier::config::ClassifierConfig;
use crate::classifier::features::extract_features;
use crate::classifier::scoring::score_contexts;
use crate::models::{
    ClassificationResult, ContextFeatures, ContextWeights, UsageContext, UsageEpisode,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// An episode paired with the classification that labelled it.
#[derive(Debug, Clone)]
pub struct ClassifiedEpisode {
    pub episode: UsageEpisode,
    pub classification: ClassificationResult,
}

/// Temperature-scaled softmax. Subtracts the max first so large scores stay finite.
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores
        .iter()
        .map(|score| ((score - max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}

/// Deterministic: identical features and weights always give the same result.
pub fn classify_context(
    features: &ContextFeatures,
    weights: Option<&ContextWeights>,
    config: &ClassifierConfig,
) -> ClassificationResult {
    let scores = score_contexts(features, weights, config.unknown_baseline);
    let probabilities = softmax(&scores, config.softmax_temperature);

    let mut best = 0;
    for idx in 1..probabilities.len() {
        if probabilities[idx] > probabilities[best] {
            best = idx;
        }
    }

    let context = UsageContext::ALL[best];
    let confidence = probabilities[best];
    log_debug!(
        "classified pickup as {} ({:.2}) from scores {:?}",
        context.as_str(),
        confidence,
        scores
    );

    ClassificationResult {
        context,
        confidence,
        probabilities: UsageContext::ALL.into_iter().zip(probabilities).collect::<BTreeMap<_, _>>(),
    }
}

/// Classify a chronological batch; each episode sees only the ones before it.
pub fn classify_episodes(
    episodes: &[UsageEpisode],
    weights: Option<&ContextWeights>,
    avg_intervals: Option<&HashMap<u32, f64>>,
    config: &ClassifierConfig,
) -> Vec<ClassifiedEpisode> {
    episodes
        .iter()
        .enumerate()
        .map(|(idx, episode)| {
            let features = extract_features(episode, &episodes[..idx], avg_intervals, config);
            let classification = classify_context(&features, weights, config);
            let mut episode = episode.clone();
            episode.classified_context = classification.context;
            ClassifiedEpisode {
                episode,
                classification,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppCategory, FeatureIndicator};
    use crate::utils::time::local_ts;
    use chrono::Duration;

    fn habitual_pickup(hour: u32) -> ContextFeatures {
        ContextFeatures {
            time_since_last_pickup_secs: 60.0,
            hour_of_day: hour,
            notification_triggered: false,
            current_duration_secs: 10.0,
            app_category: AppCategory::SocialMedia,
            recent_pickup_count: 8,
            in_focus_session: true,
            day_of_week: 2,
            avg_pickup_interval_for_hour: 900.0,
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let config = ClassifierConfig::default();
        for hour in 0..24 {
            for category in AppCategory::ALL {
                let features = ContextFeatures {
                    app_category: category,
                    notification_triggered: hour % 2 == 0,
                    current_duration_secs: f64::from(hour) * 20.0,
                    time_since_last_pickup_secs: f64::from(hour) * 200.0,
                    ..habitual_pickup(hour)
                };
                let result = classify_context(&features, None, &config);
                let total: f64 = result.probabilities.values().sum();
                assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
                assert_eq!(result.probabilities.len(), 7);
            }
        }
    }

    #[test]
    fn habitual_social_pickup_in_focus_is_boredom_or_anxiety() {
        let config = ClassifierConfig::default();
        for hour in [3, 8, 12, 17, 22] {
            let result = classify_context(&habitual_pickup(hour), None, &config);
            assert!(matches!(
                result.context,
                UsageContext::BoredomHabit | UsageContext::AnxietyCheck
            ));
            for (context, probability) in &result.probabilities {
                if *context != result.context {
                    assert!(result.confidence > *probability);
                }
            }
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let config = ClassifierConfig::default();
        let mut weights = ContextWeights::new();
        weights
            .adjustments
            .entry(UsageContext::WorkBreak)
            .or_default()
            .insert(FeatureIndicator::AppSocialMedia, 0.3);

        let first = classify_context(&habitual_pickup(10), Some(&weights), &config);
        let second = classify_context(&habitual_pickup(10), Some(&weights), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn learned_weights_shift_the_prediction() {
        let config = ClassifierConfig::default();
        let mut weights = ContextWeights::new();
        weights
            .adjustments
            .entry(UsageContext::IntentionalTask)
            .or_default()
            .insert(FeatureIndicator::AppSocialMedia, 2.0);

        let result = classify_context(&habitual_pickup(10), Some(&weights), &config);
        assert_eq!(result.context, UsageContext::IntentionalTask);
    }

    #[test]
    fn softmax_handles_equal_scores() {
        let probabilities = softmax(&[0.5, 0.5, 0.5, 0.5], 0.3);
        for p in probabilities {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn batch_classification_is_incremental() {
        let base = local_ts(2024, 6, 12, 21, 0, 0);
        let episodes: Vec<UsageEpisode> = (0..8)
            .map(|i| {
                let start = base + Duration::seconds(i * 60);
                UsageEpisode::new(
                    format!("e{i}"),
                    start,
                    start + Duration::seconds(8),
                    AppCategory::SocialMedia,
                    false,
                    false,
                )
            })
            .collect();

        let classified = classify_episodes(&episodes, None, None, &ClassifierConfig::default());
        assert_eq!(classified.len(), 8);
        // The first pickup has no history and no rapid-repeat signal.
        assert_ne!(classified[0].classification, classified[7].classification);
        assert_eq!(classified[7].episode.classified_context, UsageContext::BoredomHabit);
        for item in &classified {
            assert_eq!(item.episode.classified_context, item.classification.context);
        }
    }
}
