//! Roast LLM - Text Capability Layer
//!
//! Provider-agnostic trait for the two generative jobs the playground needs:
//! restating text as a roast and pitching a startup idea for a problem.
//! Every deployment has the deterministic [`HeuristicCapability`]; hosted
//! providers plug in behind the [`CapabilityRouter`], which bounds them with a
//! timeout and falls back to the heuristic.

pub mod config;
pub mod heuristic;
pub mod providers;
pub mod router;

pub use config::CapabilityConfig;
pub use heuristic::HeuristicCapability;
pub use providers::OpenAICapability;
pub use router::CapabilityRouter;

use async_trait::async_trait;
use roast_core::{RoastResult, Severity};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// REQUESTS & RESULTS
// ============================================================================

/// Input for a roast restatement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastRequest {
    pub text: String,
    pub severity: Severity,
    pub tags: Vec<String>,
}

/// Input for generating one startup idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub problem_title: String,
    /// Roasted framing of the problem.
    pub problem_roast: String,
    pub tags: Vec<String>,
    /// Startup names already pitched on the problem, oldest first.
    pub existing_names: Vec<String>,
    /// Pitches already on the problem, oldest first. Includes earlier members
    /// of the current batch.
    pub existing_pitches: Vec<String>,
}

/// Raw idea content from a capability. Scores are assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedIdea {
    pub startup_name: String,
    pub pitch: String,
    pub business_model: String,
}

// ============================================================================
// TEXT CAPABILITY TRAIT
// ============================================================================

/// A source of generated text.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TextCapability: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Restate `request.text` as a sarcastic roast.
    async fn roast_text(&self, request: &RoastRequest) -> RoastResult<String>;

    /// Pitch one startup idea for the problem.
    async fn generate_idea(&self, request: &IdeaRequest) -> RoastResult<GeneratedIdea>;
}

// ============================================================================
// USAGE TRACKER
// ============================================================================

/// Counts capability traffic and token usage.
/// Thread-safe via atomic operations.
pub struct UsageTracker {
    primary_calls: AtomicU64,
    fallbacks: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            primary_calls: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        }
    }

    pub fn record_primary(&self) {
        self.primary_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tokens(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
    }

    pub fn primary_calls(&self) -> u64 {
        self.primary_calls.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens.load(Ordering::Relaxed)
    }

    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens.load(Ordering::Relaxed)
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageTracker")
            .field("primary_calls", &self.primary_calls())
            .field("fallbacks", &self.fallbacks())
            .field("prompt_tokens", &self.prompt_tokens())
            .field("completion_tokens", &self.completion_tokens())
            .finish()
    }
}
