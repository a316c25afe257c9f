mod ingest;
#[cfg(test)]
pub(crate) mod simulated;
mod source;

pub use ingest::IngestController;
pub use source::{platform_feed, PlatformUsageFeed, UsageEventSource, UsageFeedSender};
