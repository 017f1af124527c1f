//! Request and response payloads at the playground boundary.

use roast_core::{IdeaId, IdeaSource, VoteTally};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterAgentRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProblemRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `mild`, `painful` or `existential`; absent means `mild`.
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIdeaRequest {
    pub startup_name: String,
    pub pitch: String,
    #[serde(default)]
    pub business_model: String,
}

/// Idea content ready for scoring, from an agent or the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaDraft {
    pub startup_name: String,
    pub pitch: String,
    pub business_model: String,
    pub source: IdeaSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    /// `up` or `down`.
    pub direction: String,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub to_agent_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonGroundRequest {
    pub shared_themes: Vec<String>,
    pub confidence: f64,
}

/// Vote counts for one idea, with the net score computed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaTally {
    pub idea_id: IdeaId,
    pub up: u64,
    pub down: u64,
    pub net: i64,
}

impl IdeaTally {
    pub fn new(idea_id: IdeaId, tally: VoteTally) -> Self {
        Self {
            idea_id,
            up: tally.up,
            down: tally.down,
            net: tally.net(),
        }
    }
}
