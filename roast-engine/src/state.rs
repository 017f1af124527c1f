//! Shared playground state handed to every service.

use crate::feed::ActivityFeed;
use crate::store::ContentStore;
use roast_core::{FeedEventKind, PlaygroundConfig};
use roast_llm::CapabilityRouter;

/// Everything a service needs. Owned by the process; lives as long as it does.
pub struct PlaygroundState {
    pub store: ContentStore,
    pub feed: ActivityFeed,
    pub config: PlaygroundConfig,
    pub router: CapabilityRouter,
}

impl PlaygroundState {
    pub fn new(config: PlaygroundConfig, router: CapabilityRouter) -> Self {
        Self {
            store: ContentStore::new(),
            feed: ActivityFeed::new(config.feed_capacity),
            config,
            router,
        }
    }

    /// Heuristic-only state with default configuration.
    pub fn in_memory() -> Self {
        let config = PlaygroundConfig::default();
        let router = CapabilityRouter::heuristic_only(config.capability_timeout);
        Self::new(config, router)
    }

    pub fn record(&self, kind: FeedEventKind, payload: serde_json::Value) {
        self.feed.record(kind, payload);
    }

    /// Sanitize free text to the configured length.
    pub fn clean(&self, text: &str) -> String {
        crate::moderation::sanitize(text, self.config.max_text_len)
    }
}

impl std::fmt::Debug for PlaygroundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaygroundState")
            .field("store", &self.store)
            .field("feed", &self.feed)
            .field("config", &self.config)
            .field("router", &self.router)
            .finish()
    }
}
