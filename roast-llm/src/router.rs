//! Capability routing with timeout and deterministic fallback

use crate::{
    GeneratedIdea, HeuristicCapability, IdeaRequest, RoastRequest, TextCapability, UsageTracker,
};
use roast_core::{CapabilityError, RoastResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Routes text generation to an optional primary capability.
///
/// The primary is bounded by `timeout`. Errors, timeouts and blank output fall
/// back to the heuristic, so routing never fails.
pub struct CapabilityRouter {
    primary: Option<Arc<dyn TextCapability>>,
    fallback: HeuristicCapability,
    timeout: Duration,
    usage: Arc<UsageTracker>,
}

impl CapabilityRouter {
    /// Router with no hosted capability.
    pub fn heuristic_only(timeout: Duration) -> Self {
        Self {
            primary: None,
            fallback: HeuristicCapability::new(),
            timeout,
            usage: Arc::new(UsageTracker::new()),
        }
    }

    pub fn with_primary(primary: Arc<dyn TextCapability>, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            ..Self::heuristic_only(timeout)
        }
    }

    pub fn with_usage(mut self, usage: Arc<UsageTracker>) -> Self {
        self.usage = usage;
        self
    }

    pub fn primary_name(&self) -> &str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub async fn roast_text(&self, request: &RoastRequest) -> String {
        if let Some(primary) = &self.primary {
            let routed = self
                .bounded(primary.name(), "roast_text", primary.roast_text(request))
                .await;
            if let Some(text) = routed.filter(|text| !text.trim().is_empty()) {
                return text;
            }
            self.usage.record_fallback();
        }
        self.fallback.roast(request)
    }

    pub async fn generate_idea(&self, request: &IdeaRequest) -> GeneratedIdea {
        if let Some(primary) = &self.primary {
            let routed = self
                .bounded(primary.name(), "generate_idea", primary.generate_idea(request))
                .await;
            if let Some(idea) = routed.filter(|idea| !idea.pitch.trim().is_empty()) {
                return idea;
            }
            self.usage.record_fallback();
        }
        self.fallback.idea(request)
    }

    async fn bounded<T, F>(&self, provider: &str, operation: &'static str, call: F) -> Option<T>
    where
        F: Future<Output = RoastResult<T>>,
    {
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CapabilityError::Timeout {
                provider: provider.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
            .into()),
        };

        match outcome {
            Ok(value) => {
                self.usage.record_primary();
                Some(value)
            }
            Err(e) => {
                tracing::warn!(
                    provider,
                    operation,
                    error = %e,
                    "Text capability failed, using heuristic"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for CapabilityRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRouter")
            .field("primary", &self.primary.as_ref().map(|p| p.name().to_string()))
            .field("timeout", &self.timeout)
            .field("usage", &self.usage)
            .finish()
    }
}
