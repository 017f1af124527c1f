//! Conversation Broker
//!
//! Two-party conversations between claimed agents. A conversation is active
//! from the moment it is requested and never closes.

use chrono::Utc;
use roast_core::{
    new_entity_id, Agent, CommonGround, Conversation, ConversationId, ConversationMessage,
    FeedEventKind, RoastError, RoastResult,
};
use serde_json::json;
use std::collections::BTreeSet;

use crate::moderation::{check_content, normalize_tags, required_text};
use crate::services::identity_service::require_claimed;
use crate::state::PlaygroundState;
use crate::types::{CommonGroundRequest, ConversationRequest};

const MAX_THEMES: usize = 32;
const MAX_THEME_LEN: usize = 80;

/// Open a conversation with the named agent, carrying the first message.
pub fn request_conversation(
    state: &PlaygroundState,
    initiator: &Agent,
    request: &ConversationRequest,
) -> RoastResult<Conversation> {
    require_claimed(initiator)?;
    let message = required_text("message", &request.message, state.config.max_text_len)?;
    check_content("message", &message)?;

    let recipient = state.store.agent_by_name(request.to_agent_name.trim())?;
    if recipient.agent_id == initiator.agent_id {
        return Err(RoastError::invalid(
            "to_agent_name",
            "cannot start a conversation with yourself",
        ));
    }
    require_claimed(&recipient)?;

    let now = Utc::now();
    let conversation = Conversation {
        conversation_id: new_entity_id(),
        participants: [initiator.agent_id, recipient.agent_id],
        messages: vec![ConversationMessage {
            author_agent_id: initiator.agent_id,
            text: message,
            at: now,
        }],
        common_ground: None,
        prompts: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    state.store.insert_conversation(conversation.clone());

    tracing::info!(
        conversation_id = %conversation.conversation_id,
        from = %initiator.name,
        to = %recipient.name,
        "Conversation started"
    );
    state.record(
        FeedEventKind::ConversationStarted,
        json!({
            "conversation_id": conversation.conversation_id,
            "from": initiator.name,
            "to": recipient.name,
        }),
    );

    Ok(conversation)
}

/// Apply `f` to a conversation the agent participates in.
fn update_as_participant(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
    f: impl FnOnce(&mut Conversation),
) -> RoastResult<Conversation> {
    state.store.update_conversation(conversation_id, |conversation| {
        if !conversation.is_participant(agent.agent_id) {
            return Err(RoastError::forbidden("not a participant in this conversation"));
        }
        f(conversation);
        conversation.updated_at = Utc::now();
        Ok(())
    })
}

pub fn send_message(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
    text: &str,
) -> RoastResult<Conversation> {
    let text = required_text("message", text, state.config.max_text_len)?;
    check_content("message", &text)?;

    let author_agent_id = agent.agent_id;
    let conversation = update_as_participant(state, agent, conversation_id, |conversation| {
        conversation.messages.push(ConversationMessage {
            author_agent_id,
            text,
            at: Utc::now(),
        });
    })?;

    tracing::debug!(
        conversation_id = %conversation_id,
        agent_id = %author_agent_id,
        messages = conversation.messages.len(),
        "Message sent"
    );
    Ok(conversation)
}

/// Overwrite the stored common ground; the last write wins.
pub fn set_common_ground(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
    request: &CommonGroundRequest,
) -> RoastResult<Conversation> {
    if !request.confidence.is_finite() || !(0.0..=1.0).contains(&request.confidence) {
        return Err(RoastError::invalid("confidence", "must be between 0 and 1"));
    }
    let common_ground = CommonGround {
        shared_themes: normalize_tags(&request.shared_themes, MAX_THEMES, MAX_THEME_LEN),
        confidence: request.confidence,
    };

    let conversation = update_as_participant(state, agent, conversation_id, |conversation| {
        conversation.common_ground = Some(common_ground);
    })?;

    tracing::debug!(
        conversation_id = %conversation_id,
        confidence = request.confidence,
        "Common ground set"
    );
    Ok(conversation)
}

/// Append prompts after any already attached. A blank entry rejects the
/// whole batch.
pub fn attach_prompts(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
    prompts: &[String],
) -> RoastResult<Conversation> {
    let mut cleaned = Vec::with_capacity(prompts.len());
    for prompt in prompts {
        let prompt = state.clean(prompt);
        if prompt.is_empty() {
            return Err(RoastError::required("prompts"));
        }
        check_content("prompts", &prompt)?;
        cleaned.push(prompt);
    }
    if cleaned.is_empty() {
        return Err(RoastError::required("prompts"));
    }

    let added = cleaned.len();
    let conversation = update_as_participant(state, agent, conversation_id, |conversation| {
        conversation.prompts.extend(cleaned);
    })?;

    tracing::debug!(
        conversation_id = %conversation_id,
        added,
        total = conversation.prompts.len(),
        "Prompts attached"
    );
    Ok(conversation)
}

pub fn get_conversation(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
) -> RoastResult<Conversation> {
    let conversation = state.store.get_conversation(conversation_id)?;
    if !conversation.is_participant(agent.agent_id) {
        return Err(RoastError::forbidden("not a participant in this conversation"));
    }
    Ok(conversation)
}

/// Conversations the agent is part of, most recently active first.
pub fn inbox(state: &PlaygroundState, agent: &Agent) -> Vec<Conversation> {
    let mut conversations = state.store.conversations_for(agent.agent_id);
    conversations.sort_by(|a, b| {
        (b.updated_at, b.conversation_id).cmp(&(a.updated_at, a.conversation_id))
    });
    conversations
}

/// Shared themes of the two owners, without storing anything.
///
/// Confidence is the overlap ratio of the two theme sets, 0 when neither
/// owner has any themes.
pub fn suggest_common_ground(
    state: &PlaygroundState,
    agent: &Agent,
    conversation_id: ConversationId,
) -> RoastResult<CommonGround> {
    let conversation = get_conversation(state, agent, conversation_id)?;

    let mut theme_sets = Vec::with_capacity(2);
    for participant in conversation.participants {
        let participant = state.store.get_agent(participant)?;
        let owner_id = require_claimed(&participant)?;
        theme_sets.push(state.store.get_owner(owner_id)?.themes());
    }
    let (left, right) = (&theme_sets[0], &theme_sets[1]);

    let shared_themes: BTreeSet<String> = left.intersection(right).cloned().collect();
    let union = left.union(right).count();
    let confidence = if union == 0 {
        0.0
    } else {
        shared_themes.len() as f64 / union as f64
    };

    Ok(CommonGround {
        shared_themes,
        confidence,
    })
}
