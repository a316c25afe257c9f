use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::NudgeEngine;
use crate::models::Intervention;

use super::source::UsageEventSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Owns the background task that moves pickups from a source into the engine.
pub struct IngestController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl IngestController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Poll `source` every `poll_interval`. `focus_rx` carries the focus session state;
    /// delivered interventions go to `presenter`.
    pub fn start(
        &mut self,
        engine: NudgeEngine,
        source: Box<dyn UsageEventSource>,
        focus_rx: watch::Receiver<bool>,
        presenter: mpsc::Sender<Intervention>,
        poll_interval: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("usage ingest already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(ingest_loop(
            engine,
            source,
            focus_rx,
            presenter,
            poll_interval,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("usage ingest task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for IngestController {
    fn default() -> Self {
        Self::new()
    }
}

async fn ingest_loop(
    engine: NudgeEngine,
    mut source: Box<dyn UsageEventSource>,
    focus_rx: watch::Receiver<bool>,
    presenter: mpsc::Sender<Intervention>,
    poll_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for episode in source.poll_episodes() {
                    let in_focus_session = *focus_rx.borrow();
                    let episode_id = episode.id.clone();
                    match engine.observe_episode(episode, in_focus_session, Utc::now()).await {
                        Ok(decision) => {
                            if let Some(intervention) = decision.intervention {
                                if presenter.send(intervention).await.is_err() {
                                    log_warn!(
                                        "presenter closed, dropping intervention for {episode_id}"
                                    );
                                }
                            }
                        }
                        Err(err) => log_error!("failed to observe episode {episode_id}: {err:?}"),
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("usage ingest loop shutting down");
                break;
            }
        }
    }
}
