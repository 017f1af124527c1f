//! Owner profile seeding and social account linking.

use chrono::Utc;
use roast_core::{Agent, Owner, OwnerProfileSeed, RoastResult, SocialConnect, SocialPost, SocialProfile};

use crate::moderation::{normalize_tags, required_text};
use crate::services::identity_service::require_claimed;
use crate::state::PlaygroundState;

const MAX_PROFILE_ENTRIES: usize = 32;
const MAX_POSTS: usize = 50;
const MAX_ENTRY_LEN: usize = 80;

/// The owner behind a claimed agent.
pub fn owner_of(state: &PlaygroundState, agent: &Agent) -> RoastResult<Owner> {
    let owner_id = require_claimed(agent)?;
    state.store.get_owner(owner_id)
}

/// Apply manual profile fields. Provided lists replace the stored sets;
/// omitted fields are left alone.
pub fn seed_profile(
    state: &PlaygroundState,
    agent: &Agent,
    seed: &OwnerProfileSeed,
) -> RoastResult<Owner> {
    let owner_id = require_claimed(agent)?;

    let display_name = seed
        .display_name
        .as_deref()
        .map(|name| state.clean(name))
        .filter(|name| !name.is_empty());
    let bio = seed.bio.as_deref().map(|bio| state.clean(bio));
    let interests = normalize_tags(&seed.interests, MAX_PROFILE_ENTRIES, MAX_ENTRY_LEN);
    let tags = normalize_tags(&seed.tags, MAX_PROFILE_ENTRIES, MAX_ENTRY_LEN);
    let goals = normalize_tags(&seed.goals, MAX_PROFILE_ENTRIES, MAX_ENTRY_LEN);

    let owner = state.store.update_owner(owner_id, |owner| {
        if let Some(name) = display_name {
            owner.display_name = name;
        }
        if let Some(bio) = bio {
            owner.bio = bio;
        }
        if !interests.is_empty() {
            owner.interests = interests;
        }
        if !tags.is_empty() {
            owner.tags = tags;
        }
        if !goals.is_empty() {
            owner.goals = goals;
        }
        owner.updated_at = Utc::now();
    })?;

    tracing::info!(agent_id = %agent.agent_id, owner_id = %owner_id, "Owner profile seeded");
    Ok(owner)
}

/// Attach (or replace) the owner's social profile.
pub fn connect_social(
    state: &PlaygroundState,
    agent: &Agent,
    connect: &SocialConnect,
) -> RoastResult<Owner> {
    let owner_id = require_claimed(agent)?;

    let platform = required_text("platform", connect.platform.as_str(), MAX_ENTRY_LEN)?.to_lowercase();
    let username = required_text("username", connect.username.as_str(), MAX_ENTRY_LEN)?;

    let posts: Vec<SocialPost> = connect
        .posts
        .iter()
        .take(MAX_POSTS)
        .map(|post| SocialPost {
            caption: state.clean(&post.caption),
            topics: normalize_tags(&post.topics, MAX_PROFILE_ENTRIES, MAX_ENTRY_LEN)
                .into_iter()
                .collect(),
        })
        .collect();

    let now = Utc::now();
    let profile = SocialProfile {
        platform,
        username,
        followers_count: connect.followers_count,
        following_count: connect.following_count,
        posts,
        connected_at: now,
    };

    let owner = state.store.update_owner(owner_id, |owner| {
        owner.social_profile = Some(profile);
        owner.updated_at = now;
    })?;

    tracing::info!(
        agent_id = %agent.agent_id,
        owner_id = %owner_id,
        posts = owner.social_profile.as_ref().map(|p| p.posts.len()).unwrap_or(0),
        "Social profile connected"
    );
    Ok(owner)
}
