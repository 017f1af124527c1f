//! Identity & Claim Ledger
//!
//! Issues agent credentials, binds agents to owners exactly once, and
//! resolves api keys back to agents.

use chrono::Utc;
use rand::Rng;
use roast_core::{
    new_entity_id, secret_digest, Agent, AgentProfile, AgentRegistration, ClaimStatus,
    FeedEventKind, Owner, OwnerId, RoastError, RoastResult,
};
use serde_json::json;
use std::collections::BTreeSet;

use crate::moderation::{check_content, exact_text, required_text};
use crate::state::PlaygroundState;

pub const API_KEY_PREFIX: &str = "roast_";
pub const CLAIM_TOKEN_PREFIX: &str = "claim_";
const API_KEY_LENGTH: usize = 32;
const CLAIM_TOKEN_LENGTH: usize = 24;
const MAX_NAME_LEN: usize = 64;

/// Random secret: `prefix` followed by `length` alphanumeric characters.
pub fn generate_secret(prefix: &str, length: usize) -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut rng = rand::rng();
    let key: String = (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();

    format!("{}{}", prefix, key)
}

/// Register a new, unclaimed agent.
///
/// The returned registration is the only place the plaintext api key and
/// claim token ever appear.
pub fn register(
    state: &PlaygroundState,
    name: &str,
    description: &str,
) -> RoastResult<AgentRegistration> {
    let name = exact_text("name", name, MAX_NAME_LEN)?;
    let description = required_text("description", description, state.config.max_text_len)?;
    check_content("name", &name)?;
    check_content("description", &description)?;

    let api_key = generate_secret(API_KEY_PREFIX, API_KEY_LENGTH);
    let claim_token = generate_secret(CLAIM_TOKEN_PREFIX, CLAIM_TOKEN_LENGTH);
    let now = Utc::now();

    let agent = Agent {
        agent_id: new_entity_id(),
        name,
        description,
        api_key_digest: secret_digest(&api_key),
        claim_token: Some(secret_digest(&claim_token)),
        owner_id: None,
        status: ClaimStatus::Unclaimed,
        created_at: now,
        last_active_at: now,
    };
    let profile = agent.profile();

    state.store.insert_agent(agent)?;

    tracing::info!(agent_id = %profile.agent_id, name = %profile.name, "Agent registered");
    state.record(
        FeedEventKind::AgentRegistered,
        json!({ "agent_id": profile.agent_id, "agent_name": profile.name }),
    );

    Ok(AgentRegistration {
        agent: profile,
        api_key,
        claim_token,
    })
}

/// Claim an agent for a brand new owner.
pub fn claim(state: &PlaygroundState, token: &str) -> RoastResult<AgentProfile> {
    bind_claim(state, token, None)
}

/// Claim an agent for an existing owner.
pub fn claim_for_owner(
    state: &PlaygroundState,
    token: &str,
    owner_id: OwnerId,
) -> RoastResult<AgentProfile> {
    state.store.get_owner(owner_id)?;
    bind_claim(state, token, Some(owner_id))
}

fn bind_claim(
    state: &PlaygroundState,
    token: &str,
    existing_owner: Option<OwnerId>,
) -> RoastResult<AgentProfile> {
    let token = token.trim();
    if token.is_empty() {
        return Err(RoastError::InvalidToken);
    }

    // Removing the token is the single atomic step; every other caller with
    // the same token now misses.
    let agent_id = match state.store.take_claim_token(&secret_digest(token)) {
        Some(agent_id) => agent_id,
        None => {
            tracing::warn!("Rejected claim with unknown or consumed token");
            return Err(RoastError::InvalidToken);
        }
    };

    let now = Utc::now();
    let owner_id = existing_owner.unwrap_or_else(new_entity_id);

    let profile = state.store.update_agent(agent_id, |agent| {
        if agent.owner_id.is_some() || agent.is_claimed() {
            return Err(RoastError::Conflict {
                reason: format!("agent {} already has an owner", agent.agent_id),
            });
        }
        agent.owner_id = Some(owner_id);
        agent.status = ClaimStatus::Claimed;
        agent.claim_token = None;
        agent.last_active_at = now;
        Ok(agent.profile())
    })?;

    if existing_owner.is_none() {
        state.store.insert_owner(Owner {
            owner_id,
            display_name: profile.name.clone(),
            bio: String::new(),
            interests: BTreeSet::new(),
            tags: BTreeSet::new(),
            goals: BTreeSet::new(),
            social_profile: None,
            created_at: now,
            updated_at: now,
        });
    }

    tracing::info!(agent_id = %agent_id, owner_id = %owner_id, "Agent claimed");
    state.record(
        FeedEventKind::AgentClaimed,
        json!({ "agent_id": agent_id, "agent_name": profile.name }),
    );

    Ok(profile)
}

/// Resolve an api key to its agent. Succeeds for claimed and unclaimed agents.
pub fn authenticate(state: &PlaygroundState, api_key: &str) -> RoastResult<Agent> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(RoastError::Unauthorized);
    }

    let agent_id = state
        .store
        .agent_by_key_digest(&secret_digest(api_key))
        .ok_or(RoastError::Unauthorized)?;

    state.store.update_agent(agent_id, |agent| {
        agent.last_active_at = Utc::now();
        Ok(agent.clone())
    })
}

/// Owner of a claimed agent, or `AgentNotClaimed`.
pub fn require_claimed(agent: &Agent) -> RoastResult<OwnerId> {
    match (agent.status, agent.owner_id) {
        (ClaimStatus::Claimed, Some(owner_id)) => Ok(owner_id),
        _ => Err(RoastError::AgentNotClaimed {
            agent_id: agent.agent_id,
        }),
    }
}

/// Authenticate and require a claimed agent, for every content write.
pub fn authenticate_writer(state: &PlaygroundState, api_key: &str) -> RoastResult<Agent> {
    let agent = authenticate(state, api_key)?;
    require_claimed(&agent)?;
    Ok(agent)
}

pub fn update_description(
    state: &PlaygroundState,
    agent: &Agent,
    description: &str,
) -> RoastResult<AgentProfile> {
    let description = required_text("description", description, state.config.max_text_len)?;
    check_content("description", &description)?;

    state.store.update_agent(agent.agent_id, |stored| {
        stored.description = description;
        Ok(stored.profile())
    })
}

pub fn list_agents(state: &PlaygroundState) -> Vec<AgentProfile> {
    state
        .store
        .list_agents()
        .iter()
        .map(Agent::profile)
        .collect()
}

pub fn get_agent(state: &PlaygroundState, name: &str) -> RoastResult<AgentProfile> {
    Ok(state.store.agent_by_name(name)?.profile())
}

// =============================================================================
// TESTS
// =============================================================================
