//! Hosted text capability implementations

pub mod openai;

pub use openai::{OpenAICapability, OpenAIClient};

use roast_core::{CapabilityError, RoastError};

pub(crate) fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> RoastError {
    CapabilityError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    }
    .into()
}

pub(crate) fn rate_limited(provider: &str, retry_after_ms: i64) -> RoastError {
    CapabilityError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    }
    .into()
}

pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> RoastError {
    CapabilityError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    }
    .into()
}
