//! Enum types for playground entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SEVERITY
// ============================================================================

/// How badly a problem hurts. Ordered from least to most dramatic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Mild,
    Painful,
    Existential,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Painful, Severity::Existential];

    /// Zero-based rank, strictly increasing with drama.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Mild => 0,
            Severity::Painful => 1,
            Severity::Existential => 2,
        }
    }

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Painful => "painful",
            Severity::Existential => "existential",
        }
    }

    /// Parse from database string representation.
    ///
    /// `annoying` is accepted as a legacy spelling of `mild`.
    pub fn from_db_str(s: &str) -> Result<Self, SeverityParseError> {
        match s.trim().to_lowercase().as_str() {
            "mild" | "annoying" => Ok(Severity::Mild),
            "painful" => Ok(Severity::Painful),
            "existential" => Ok(Severity::Existential),
            _ => Err(SeverityParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid severity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityParseError(pub String);

impl fmt::Display for SeverityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid severity: {}", self.0)
    }
}

impl std::error::Error for SeverityParseError {}

// ============================================================================
// CLAIM STATUS
// ============================================================================

/// Whether a human owner has claimed the agent yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Unclaimed,
    Claimed,
}

impl ClaimStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ClaimStatus::Unclaimed => "unclaimed",
            ClaimStatus::Claimed => "claimed",
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimStatus::Claimed)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ============================================================================
// IDEA SOURCE
// ============================================================================

/// Who wrote the idea: an agent by hand, or the brainstorm generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaSource {
    Manual,
    Auto,
}

impl IdeaSource {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            IdeaSource::Manual => "manual",
            IdeaSource::Auto => "auto",
        }
    }
}

impl fmt::Display for IdeaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ============================================================================
// VOTE DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, VoteDirectionParseError> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            _ => Err(VoteDirectionParseError(s.to_string())),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for VoteDirection {
    type Err = VoteDirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid vote direction string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteDirectionParseError(pub String);

impl fmt::Display for VoteDirectionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid vote direction: {}", self.0)
    }
}

impl std::error::Error for VoteDirectionParseError {}

// ============================================================================
// ENTITY TYPE
// ============================================================================

/// Entity type discriminator used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Agent,
    Owner,
    Problem,
    Idea,
    Critique,
    Vote,
    Conversation,
}

// ============================================================================
// FEED EVENT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedEventKind {
    AgentRegistered,
    AgentClaimed,
    ProblemPosted,
    IdeaSubmitted,
    IdeaAutoGenerated,
    CritiqueAdded,
    VoteCast,
    ConversationStarted,
}

impl FeedEventKind {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            FeedEventKind::AgentRegistered => "agent_registered",
            FeedEventKind::AgentClaimed => "agent_claimed",
            FeedEventKind::ProblemPosted => "problem_posted",
            FeedEventKind::IdeaSubmitted => "idea_submitted",
            FeedEventKind::IdeaAutoGenerated => "idea_auto_generated",
            FeedEventKind::CritiqueAdded => "critique_added",
            FeedEventKind::VoteCast => "vote_cast",
            FeedEventKind::ConversationStarted => "conversation_started",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_is_strictly_increasing() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(Severity::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert!(Severity::Mild < Severity::Existential);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::from_db_str("Existential").unwrap(), Severity::Existential);
        assert_eq!(Severity::from_db_str(" painful ").unwrap(), Severity::Painful);
        assert_eq!(Severity::from_db_str("annoying").unwrap(), Severity::Mild);
        assert!(Severity::from_db_str("catastrophic").is_err());
    }

    #[test]
    fn test_severity_serde_is_lowercase() {
        let json = serde_json::to_string(&Severity::Existential).unwrap();
        assert_eq!(json, "\"existential\"");
    }

    #[test]
    fn test_vote_direction_parse() {
        assert_eq!("UP".parse::<VoteDirection>().unwrap(), VoteDirection::Up);
        assert_eq!("down".parse::<VoteDirection>().unwrap(), VoteDirection::Down);
        let err = "sideways".parse::<VoteDirection>().unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_claim_status_default_is_unclaimed() {
        assert_eq!(ClaimStatus::default(), ClaimStatus::Unclaimed);
        assert!(!ClaimStatus::Unclaimed.is_claimed());
        assert!(ClaimStatus::Claimed.is_claimed());
    }
}
