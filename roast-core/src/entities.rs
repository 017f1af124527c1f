//! Core entity structures

use crate::{
    AgentId, ClaimStatus, ConversationId, CritiqueId, FeedEventId, FeedEventKind, IdeaId,
    IdeaSource, OwnerId, ProblemId, Severity, Timestamp, VoteDirection,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// AGENTS & OWNERS
// ============================================================================

/// Agent - an automated actor with its own credential.
///
/// The api key is held only as a digest. The claim token is present until the
/// agent is claimed and is then cleared for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: AgentId,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing)]
    pub api_key_digest: String,
    #[serde(skip_serializing)]
    pub claim_token: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub status: ClaimStatus,
    pub created_at: Timestamp,
    pub last_active_at: Timestamp,
}

impl Agent {
    pub fn is_claimed(&self) -> bool {
        self.status.is_claimed()
    }

    /// Public view of the agent, safe to hand to any caller.
    pub fn profile(&self) -> AgentProfile {
        AgentProfile {
            agent_id: self.agent_id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            owner_id: self.owner_id,
            created_at: self.created_at,
            last_active_at: self.last_active_at,
        }
    }
}

/// Agent as seen by other agents. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub agent_id: AgentId,
    pub name: String,
    pub description: String,
    pub status: ClaimStatus,
    pub owner_id: Option<OwnerId>,
    pub created_at: Timestamp,
    pub last_active_at: Timestamp,
}

/// Result of a registration. The only time the plaintext secrets are exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRegistration {
    pub agent: AgentProfile,
    pub api_key: String,
    pub claim_token: String,
}

/// A single post pulled from the owner's social account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub caption: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub platform: String,
    pub username: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts: Vec<SocialPost>,
    pub connected_at: Timestamp,
}

/// Owner - the human behind one or more agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub owner_id: OwnerId,
    pub display_name: String,
    pub bio: String,
    pub interests: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub goals: BTreeSet<String>,
    pub social_profile: Option<SocialProfile>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owner {
    /// Every lowercase theme this owner is associated with: interests, tags,
    /// goals and the topics of their social posts.
    pub fn themes(&self) -> BTreeSet<String> {
        let social_topics = self
            .social_profile
            .iter()
            .flat_map(|profile| profile.posts.iter())
            .flat_map(|post| post.topics.iter());

        self.interests
            .iter()
            .chain(self.tags.iter())
            .chain(self.goals.iter())
            .chain(social_topics)
            .map(|theme| theme.trim().to_lowercase())
            .filter(|theme| !theme.is_empty())
            .collect()
    }
}

/// Manual profile fields supplied by an agent on behalf of its owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerProfileSeed {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialConnect {
    pub platform: String,
    pub username: String,
    pub followers_count: u64,
    pub following_count: u64,
    #[serde(default)]
    pub posts: Vec<SocialPost>,
}

// ============================================================================
// CONTENT
// ============================================================================

/// Problem - a human pain point, restated with a roast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub problem_id: ProblemId,
    pub title: String,
    pub description: String,
    pub roast_description: String,
    pub roast_score: f64,
    pub tags: BTreeSet<String>,
    pub severity: Severity,
    pub author_agent_id: AgentId,
    pub created_at: Timestamp,
}

/// Idea - a startup pitched at a problem. Scores are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub idea_id: IdeaId,
    pub problem_id: ProblemId,
    pub startup_name: String,
    pub pitch: String,
    pub business_model: String,
    pub author_agent_id: AgentId,
    pub novelty_score: f64,
    pub roast_score: f64,
    pub source: IdeaSource,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemWithIdeas {
    pub problem: Problem,
    pub ideas: Vec<Idea>,
}

/// Critique - append-only commentary on an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub critique_id: CritiqueId,
    pub idea_id: IdeaId,
    pub author_agent_id: AgentId,
    pub text: String,
    pub created_at: Timestamp,
}

/// Vote - at most one live vote per (idea, agent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub idea_id: IdeaId,
    pub author_agent_id: AgentId,
    pub direction: VoteDirection,
    pub rationale: String,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: u64,
    pub down: u64,
}

impl VoteTally {
    pub fn record(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.up += 1,
            VoteDirection::Down => self.down += 1,
        }
    }

    /// Net score: up minus down.
    pub fn net(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub vote: Vote,
    pub tally: VoteTally,
}

// ============================================================================
// CONVERSATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub author_agent_id: AgentId,
    pub text: String,
    pub at: Timestamp,
}

/// Shared-interest summary between the two owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonGround {
    pub shared_themes: BTreeSet<String>,
    pub confidence: f64,
}

/// Conversation - exactly two agents, ordered by who initiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: ConversationId,
    /// `[initiator, recipient]`
    pub participants: [AgentId; 2],
    pub messages: Vec<ConversationMessage>,
    pub common_ground: Option<CommonGround>,
    pub prompts: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    pub fn is_participant(&self, agent_id: AgentId) -> bool {
        self.participants.contains(&agent_id)
    }

    pub fn initiator(&self) -> AgentId {
        self.participants[0]
    }

    pub fn recipient(&self) -> AgentId {
        self.participants[1]
    }
}

// ============================================================================
// READ VIEWS
// ============================================================================

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaSummary {
    pub idea_id: IdeaId,
    pub problem_id: ProblemId,
    pub startup_name: String,
    pub pitch: String,
    pub author_agent_id: AgentId,
    pub source: IdeaSource,
    pub novelty_score: f64,
    pub roast_score: f64,
    pub up_votes: u64,
    pub down_votes: u64,
    pub net_score: i64,
    pub critique_count: usize,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub agents_total: usize,
    pub agents_claimed: usize,
    pub agents_unclaimed: usize,
    pub owners: usize,
    pub problems: usize,
    pub ideas_total: usize,
    pub ideas_manual: usize,
    pub ideas_auto: usize,
    pub votes: usize,
    pub critiques: usize,
    pub conversations: usize,
}

/// Activity feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub event_id: FeedEventId,
    pub kind: FeedEventKind,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
