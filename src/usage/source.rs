use std::sync::mpsc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::models::{AppCategory, UsageEpisode};

/// Anything that produces completed pickups.
pub trait UsageEventSource: Send {
    /// Returns the episodes completed since the last poll, oldest first.
    fn poll_episodes(&mut self) -> Vec<UsageEpisode>;
}

/// Create the platform adapter pair. Platform callbacks hold the sender.
pub fn platform_feed() -> (UsageFeedSender, PlatformUsageFeed) {
    let (sender, receiver) = mpsc::channel();
    (UsageFeedSender { sender }, PlatformUsageFeed { receiver })
}

#[derive(Clone)]
pub struct UsageFeedSender {
    sender: mpsc::Sender<UsageEpisode>,
}

impl UsageFeedSender {
    pub fn push(&self, episode: UsageEpisode) -> Result<()> {
        self.sender
            .send(episode)
            .map_err(|err| anyhow!("usage feed closed, dropped episode {}", err.0.id))
    }

    /// Report one completed pickup as the platform sees it.
    pub fn report(
        &self,
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        app_category: AppCategory,
        in_focus_session: bool,
        notification_triggered: bool,
    ) -> Result<()> {
        self.push(UsageEpisode::new(
            id,
            start_time,
            end_time,
            app_category,
            in_focus_session,
            notification_triggered,
        ))
    }
}

pub struct PlatformUsageFeed {
    receiver: mpsc::Receiver<UsageEpisode>,
}

impl UsageEventSource for PlatformUsageFeed {
    fn poll_episodes(&mut self) -> Vec<UsageEpisode> {
        self.receiver.try_iter().collect()
    }
}
