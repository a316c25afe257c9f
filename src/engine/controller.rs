use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use crate::analysis::{analyze_usage_pattern, compute_daily_summary, hourly_average_intervals};
use crate::classifier::{classify_context, extract_features};
use crate::db::{Database, FeedbackCommit};
use crate::error::EngineError;
use crate::feedback::{
    compute_adaptation_metrics, correction_for, generate_adaptation_summary, process_feedback,
    AdaptationMetrics, FeedbackResult,
};
use crate::intervention::{
    get_arm_estimates, initialize_adaptation, select_intervention, FocusSnapshot,
};
use crate::models::{
    AdaptationState, ArmEstimate, ContextWeights, DailySummary, InterventionFeedback,
    InterventionOutcome, QuietHours, UsageContext, UsageEpisode,
};
use crate::settings::{EngineSettings, SettingsStore};

use super::EpisodeDecision;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

struct EngineState {
    weights: ContextWeights,
    adaptation: AdaptationState,
    rng: StdRng,
}

/// Per-user owning store. Holds the learner state behind one lock so there is a
/// single writer, and persists every change before it becomes visible.
///
/// Settings are read from the store at the start of every operation, so updates
/// and reloads apply to the next call.
#[derive(Clone)]
pub struct NudgeEngine {
    state: Arc<Mutex<EngineState>>,
    db: Database,
    settings: Arc<SettingsStore>,
}

impl NudgeEngine {
    /// Loads persisted weights and bandit state, or starts fresh.
    pub async fn open(db: Database, settings: Arc<SettingsStore>, rng: StdRng) -> Result<Self> {
        let weights = match db.load_weights().await? {
            Some(weights) => weights,
            None => {
                let weights = ContextWeights::new();
                db.save_weights(&weights).await?;
                weights
            }
        };
        let adaptation = match db.load_adaptation().await? {
            Some(adaptation) => adaptation,
            None => {
                let adaptation = initialize_adaptation();
                db.save_adaptation(&adaptation).await?;
                adaptation
            }
        };

        log_info!(
            "nudge engine ready: {} corrections, {} feedback events",
            weights.correction_count,
            adaptation.total_feedback
        );

        Ok(Self {
            state: Arc::new(Mutex::new(EngineState {
                weights,
                adaptation,
                rng,
            })),
            db,
            settings,
        })
    }

    /// The settings the next operation will run with.
    pub fn settings(&self) -> EngineSettings {
        self.settings.settings()
    }

    /// Classify a completed pickup and decide whether to intervene.
    ///
    /// `in_focus_session` comes from the focus session service. A pickup counts as
    /// in focus if either that service or the platform says so.
    pub async fn observe_episode(
        &self,
        mut episode: UsageEpisode,
        in_focus_session: bool,
        now: DateTime<Utc>,
    ) -> Result<EpisodeDecision> {
        let mut guard = self.state.lock().await;
        let settings = self.settings.settings();

        episode.in_focus_session |= in_focus_session;
        let in_focus_session = episode.in_focus_session;

        let history_start = episode.start_time - Duration::days(settings.history_days);
        let history = self
            .db
            .get_episodes_between(history_start, episode.start_time)
            .await?;

        let intervals = hourly_average_intervals(&history);
        let features = extract_features(
            &episode,
            &history,
            Some(&intervals),
            &settings.classifier,
        );
        let classification =
            classify_context(&features, Some(&guard.weights), &settings.classifier);
        episode.classified_context = classification.context;
        episode.user_corrected_context = None;

        log_debug!(
            "episode {} classified as {} ({:.2})",
            episode.id,
            classification.context.as_str(),
            classification.confidence
        );

        self.db.insert_episode(&episode).await?;

        let mut window = history;
        window.push(episode.clone());
        let pattern = analyze_usage_pattern(&window, now, &settings.analysis);

        let focus = FocusSnapshot {
            in_focus_session,
            now,
        };
        let state = &mut *guard;
        let intervention = select_intervention(
            classification.context,
            &pattern,
            &state.adaptation,
            &episode.id,
            focus,
            &settings.selector,
            &mut state.rng,
        );

        if let Some(intervention) = &intervention {
            self.db.insert_intervention(intervention).await?;
        }

        Ok(EpisodeDecision {
            episode,
            classification,
            pattern,
            intervention,
        })
    }

    /// Fold user feedback for a delivered intervention into the learner state.
    ///
    /// A second submission for the same intervention fails with
    /// `EngineError::DuplicateFeedback` and changes nothing.
    pub async fn submit_feedback(
        &self,
        intervention_id: &str,
        feedback: InterventionFeedback,
        outcome: InterventionOutcome,
    ) -> Result<FeedbackResult> {
        let mut guard = self.state.lock().await;
        let settings = self.settings.settings();

        let intervention = self
            .db
            .get_intervention(intervention_id)
            .await?
            .ok_or_else(|| EngineError::UnknownIntervention(intervention_id.to_string()))?;

        if intervention.acknowledged || intervention.feedback.is_some() {
            log_warn!("rejecting repeated feedback for intervention {intervention_id}");
            return Err(EngineError::DuplicateFeedback {
                intervention_id: intervention_id.to_string(),
            }
            .into());
        }

        let episode = self
            .db
            .get_episode(&intervention.episode_id)
            .await?
            .ok_or_else(|| EngineError::UnknownEpisode(intervention.episode_id.clone()))?;

        let history_start = episode.start_time - Duration::days(settings.history_days);
        let recent = self
            .db
            .get_episodes_between(history_start, episode.start_time)
            .await?;

        let result = process_feedback(
            &intervention,
            &feedback,
            outcome,
            &episode,
            &recent,
            &guard.weights,
            &guard.adaptation,
            &settings.classifier,
        );

        let corrected_episode =
            correction_for(&feedback, &episode).map(|context| (episode.id.clone(), context));

        self.db
            .commit_feedback(FeedbackCommit {
                intervention: result.intervention.clone(),
                feedback,
                outcome,
                corrected_episode,
                weights: result.weights.clone(),
                adaptation: result.adaptation.clone(),
            })
            .await?;

        guard.weights = result.weights.clone();
        guard.adaptation = result.adaptation.clone();

        Ok(result)
    }

    pub async fn arm_estimates(&self) -> Vec<ArmEstimate> {
        let guard = self.state.lock().await;
        get_arm_estimates(&guard.adaptation)
    }

    pub async fn weights(&self) -> ContextWeights {
        self.state.lock().await.weights.clone()
    }

    pub async fn adaptation(&self) -> AdaptationState {
        self.state.lock().await.adaptation.clone()
    }

    pub async fn adaptation_metrics(&self) -> Result<AdaptationMetrics> {
        let history = self.db.feedback_history().await?;
        Ok(compute_adaptation_metrics(&history))
    }

    pub async fn adaptation_summary(&self) -> Result<String> {
        let metrics = self.adaptation_metrics().await?;
        log_debug!(
            "adaptation phase {} after {} feedback events",
            metrics.adaptation_phase.as_str(),
            metrics.total_feedback
        );
        Ok(generate_adaptation_summary(&metrics))
    }

    /// Summary of the episodes that started on `day` in local time.
    pub async fn daily_summary(&self, day: NaiveDate) -> Result<DailySummary> {
        let start = local_midnight(day)?;
        let next_day = day
            .succ_opt()
            .ok_or_else(|| anyhow!("no day after {day}"))?;
        let end = local_midnight(next_day)?;

        let episodes = self.db.get_episodes_between(start, end).await?;
        Ok(compute_daily_summary(&episodes, &self.settings.settings().analysis))
    }

    /// Stop intervening for `context` until it is allowed again.
    pub async fn suppress_context(&self, context: UsageContext) -> Result<AdaptationState> {
        self.update_adaptation_with(|state| state.with_suppressed_context(context))
            .await
    }

    pub async fn allow_context(&self, context: UsageContext) -> Result<AdaptationState> {
        self.update_adaptation_with(|state| state.without_suppressed_context(context))
            .await
    }

    pub async fn set_quiet_hours(&self, quiet_hours: Vec<QuietHours>) -> Result<AdaptationState> {
        self.update_adaptation_with(move |state| state.with_quiet_hours(quiet_hours))
            .await
    }

    async fn update_adaptation_with<F>(&self, update: F) -> Result<AdaptationState>
    where
        F: FnOnce(&AdaptationState) -> AdaptationState,
    {
        let mut guard = self.state.lock().await;
        let next = update(&guard.adaptation);
        self.db.save_adaptation(&next).await?;
        guard.adaptation = next.clone();
        log_info!(
            "opt-outs updated: {} suppressed contexts, {} quiet windows",
            next.suppressed_contexts.len(),
            next.quiet_hours.len()
        );
        Ok(next)
    }
}

fn local_midnight(day: NaiveDate) -> Result<DateTime<Utc>> {
    let naive = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("invalid midnight for {day}"))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("midnight does not exist locally on {day}"))?;
    Ok(local.with_timezone(&Utc))
}
