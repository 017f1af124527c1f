//! OpenAI chat-completions capability

pub mod capability;
pub mod client;
pub mod types;

pub use capability::OpenAICapability;
pub use client::OpenAIClient;
