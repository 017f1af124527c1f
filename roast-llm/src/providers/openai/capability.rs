//! OpenAI text capability using chat completions

use super::client::OpenAIClient;
use super::types::{CompletionRequest, CompletionResponse, IdeaPayload, Message, ResponseFormat};
use crate::providers::invalid_response;
use crate::{GeneratedIdea, IdeaRequest, RoastRequest, TextCapability, UsageTracker};
use async_trait::async_trait;
use roast_core::{RoastResult, Severity};
use std::sync::Arc;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Roasts and idea pitches from an OpenAI chat model.
pub struct OpenAICapability {
    client: OpenAIClient,
    model: String,
    usage: Arc<UsageTracker>,
}

impl OpenAICapability {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            usage: Arc::new(UsageTracker::new()),
        }
    }

    /// Create capability with default gpt-4o-mini model.
    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(OpenAIClient::new(api_key, 60), DEFAULT_MODEL)
    }

    /// Share a usage tracker with the router.
    pub fn with_usage(mut self, usage: Arc<UsageTracker>) -> Self {
        self.usage = usage;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> RoastResult<String> {
        let response: CompletionResponse = self.client.request("chat/completions", request).await?;

        if let Some(usage) = &response.usage {
            self.usage.record_tokens(
                usage.prompt_tokens.max(0) as u64,
                usage.completion_tokens.unwrap_or(0).max(0) as u64,
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| invalid_response("openai", "No completion in response"))
    }
}

fn severity_instruction(severity: Severity) -> &'static str {
    match severity {
        Severity::Mild => "Keep it light: a gentle eye-roll.",
        Severity::Painful => "Be properly sarcastic: this clearly hurts.",
        Severity::Existential => "Go all in: treat this as a crisis of human civilization.",
    }
}

pub(crate) fn build_idea_prompt(request: &IdeaRequest) -> String {
    let existing = if request.existing_names.is_empty() {
        "No existing ideas yet.".to_string()
    } else {
        format!(
            "Existing ideas (avoid repeating): {}",
            request.existing_names.join(", ")
        )
    };

    format!(
        "Problem: \"{}\"\nSarcastic framing: \"{}\"\nTags: {}\n{}\n\n\
         Generate ONE creative, novel startup idea. Be witty and medium-roast sarcastic.\n\
         Respond in JSON: {{\"startupName\": \"...\", \"pitch\": \"2-3 sentence pitch\", \
         \"businessModel\": \"one-liner with humor\"}}",
        request.problem_title,
        request.problem_roast,
        request.tags.join(", "),
        existing
    )
}

pub(crate) fn parse_idea(content: &str) -> RoastResult<GeneratedIdea> {
    let payload: IdeaPayload = serde_json::from_str(content.trim())
        .map_err(|e| invalid_response("openai", format!("Idea is not valid JSON: {}", e)))?;

    if payload.startup_name.trim().is_empty() || payload.pitch.trim().is_empty() {
        return Err(invalid_response("openai", "Idea is missing startupName or pitch"));
    }

    Ok(GeneratedIdea {
        startup_name: payload.startup_name.trim().to_string(),
        pitch: payload.pitch.trim().to_string(),
        business_model: payload.business_model.trim().to_string(),
    })
}

#[async_trait]
impl TextCapability for OpenAICapability {
    fn name(&self) -> &str {
        "openai"
    }

    async fn roast_text(&self, request: &RoastRequest) -> RoastResult<String> {
        let tags = if request.tags.is_empty() {
            String::new()
        } else {
            format!("\nTags: {}", request.tags.join(", "))
        };

        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(format!(
                    "You restate human problems as short sarcastic roasts for a startup playground. \
                     Never mock protected characteristics. Two sentences at most. {}",
                    severity_instruction(request.severity)
                )),
                Message::user(format!("Roast this problem:\n\n{}{}", request.text, tags)),
            ],
            max_tokens: Some(160),
            temperature: Some(0.9),
            response_format: None,
        };

        self.complete(completion).await
    }

    async fn generate_idea(&self, request: &IdeaRequest) -> RoastResult<GeneratedIdea> {
        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system("You are a sarcastic startup idea generator for an agent playground."),
                Message::user(build_idea_prompt(request)),
            ],
            max_tokens: Some(300),
            temperature: Some(1.0),
            response_format: Some(ResponseFormat::json_object()),
        };

        let content = self.complete(completion).await?;
        parse_idea(&content)
    }
}

impl std::fmt::Debug for OpenAICapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICapability")
            .field("model", &self.model)
            .field("client", &self.client)
            .finish()
    }
}
