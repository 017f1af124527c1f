//! Text capability configuration

use crate::providers::openai::{capability::DEFAULT_MODEL, client::DEFAULT_BASE_URL};
use crate::{CapabilityRouter, OpenAICapability, UsageTracker};
use crate::providers::OpenAIClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, PartialEq)]
pub struct CapabilityConfig {
    /// When absent only the heuristic is used.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub requests_per_minute: u32,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_minute: 60,
        }
    }
}

impl CapabilityConfig {
    /// Create CapabilityConfig from environment variables.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY`: enables the OpenAI capability
    /// - `ROAST_LLM_MODEL`: chat model (default: gpt-4o-mini)
    /// - `ROAST_LLM_BASE_URL`: OpenAI-compatible endpoint
    /// - `ROAST_LLM_RPM`: requests per minute (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let model = std::env::var("ROAST_LLM_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.model);

        let base_url = std::env::var("ROAST_LLM_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let requests_per_minute = std::env::var("ROAST_LLM_RPM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.requests_per_minute);

        Self {
            api_key,
            model,
            base_url,
            requests_per_minute,
        }
    }

    pub fn is_hosted(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the router: OpenAI as primary when a key is present.
    pub fn build_router(&self, timeout: Duration) -> CapabilityRouter {
        let usage = Arc::new(UsageTracker::new());

        match &self.api_key {
            Some(key) => {
                let client = OpenAIClient::new(key.clone(), self.requests_per_minute)
                    .with_base_url(self.base_url.clone());
                let primary = OpenAICapability::new(client, self.model.clone())
                    .with_usage(Arc::clone(&usage));
                CapabilityRouter::with_primary(Arc::new(primary), timeout).with_usage(usage)
            }
            None => CapabilityRouter::heuristic_only(timeout).with_usage(usage),
        }
    }
}

impl std::fmt::Debug for CapabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}
