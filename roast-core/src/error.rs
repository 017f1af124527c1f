//! Error types for playground operations

use crate::EntityType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Content flagged in {field}: {reason}")]
    ContentFlagged { field: String, reason: String },
}

/// Text capability errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("No text capability configured")]
    NotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all playground errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoastError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Entity not found: {entity_type:?} {id}")]
    NotFound { entity_type: EntityType, id: String },

    #[error("Missing or unknown api key")]
    Unauthorized,

    #[error("Agent {agent_id} has not been claimed")]
    AgentNotClaimed { agent_id: Uuid },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Agent name already taken: {name}")]
    DuplicateName { name: String },

    #[error("Claim token is invalid or already used")]
    InvalidToken,

    #[error("Invalid count {requested}: must be between 1 and {max}")]
    InvalidCount { requested: i64, max: usize },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl RoastError {
    pub fn not_found(entity_type: EntityType, id: impl fmt::Display) -> Self {
        RoastError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        RoastError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredFieldMissing {
            field: field.into(),
        }
        .into()
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
        .into()
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RoastError::Validation(ValidationError::ContentFlagged { .. }) => {
                ErrorKind::ContentFlagged
            }
            RoastError::Validation(_) => ErrorKind::ValidationError,
            RoastError::NotFound { .. } => ErrorKind::NotFound,
            RoastError::Unauthorized => ErrorKind::Unauthorized,
            RoastError::AgentNotClaimed { .. } => ErrorKind::AgentNotClaimed,
            RoastError::Forbidden { .. } => ErrorKind::Forbidden,
            RoastError::DuplicateName { .. } => ErrorKind::DuplicateName,
            RoastError::InvalidToken => ErrorKind::InvalidToken,
            RoastError::InvalidCount { .. } => ErrorKind::InvalidCount,
            RoastError::Conflict { .. } => ErrorKind::Conflict,
            RoastError::Capability(_) => ErrorKind::CapabilityFailed,
            RoastError::Config(_) => ErrorKind::ValidationError,
        }
    }

    /// Uniform failure shape for any transport.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Result type alias for playground operations.
pub type RoastResult<T> = Result<T, RoastError>;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Stable classification of every error, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    ContentFlagged,
    NotFound,
    Unauthorized,
    AgentNotClaimed,
    Forbidden,
    DuplicateName,
    InvalidToken,
    InvalidCount,
    Conflict,
    CapabilityFailed,
}

impl ErrorKind {
    /// HTTP status a transport layer should map this kind to.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::ValidationError | ErrorKind::InvalidCount => 400,
            ErrorKind::Unauthorized | ErrorKind::InvalidToken => 401,
            ErrorKind::AgentNotClaimed | ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateName | ErrorKind::Conflict => 409,
            ErrorKind::ContentFlagged => 422,
            ErrorKind::CapabilityFailed => 502,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "Request validation failed",
            ErrorKind::ContentFlagged => "Content violates the roast rules",
            ErrorKind::NotFound => "Requested entity does not exist",
            ErrorKind::Unauthorized => "Missing or invalid api key",
            ErrorKind::AgentNotClaimed => "Agent must be claimed before it can write",
            ErrorKind::Forbidden => "Not permitted",
            ErrorKind::DuplicateName => "Agent name already taken",
            ErrorKind::InvalidToken => "Claim token is invalid or already used",
            ErrorKind::InvalidCount => "Requested count is out of range",
            ErrorKind::Conflict => "Concurrent update conflict",
            ErrorKind::CapabilityFailed => "Text capability unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_message())
    }
}

// ============================================================================
// ENVELOPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<RoastError> for ErrorBody {
    fn from(err: RoastError) -> Self {
        err.to_body()
    }
}

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

// =============================================================================
// TESTS
// =============================================================================
