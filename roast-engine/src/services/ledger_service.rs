//! Voting & Critique Ledger
//!
//! Critiques are append-only. Votes are keyed by `(idea, author)`; a re-vote
//! overwrites the earlier one, and tallies are always recomputed from the
//! stored votes.

use chrono::Utc;
use roast_core::{
    new_entity_id, AgentId, Critique, FeedEventKind, IdeaId, RoastError, RoastResult, Vote,
    VoteDirection, VoteReceipt, VoteTally,
};
use serde_json::json;

use crate::moderation::{check_content, required_text};
use crate::state::PlaygroundState;
use crate::types::VoteRequest;

pub fn add_critique(
    state: &PlaygroundState,
    author_agent_id: AgentId,
    idea_id: IdeaId,
    text: &str,
) -> RoastResult<Critique> {
    let text = required_text("text", text, state.config.max_text_len)?;
    check_content("text", &text)?;
    state.store.get_idea(idea_id)?;

    let critique = Critique {
        critique_id: new_entity_id(),
        idea_id,
        author_agent_id,
        text,
        created_at: Utc::now(),
    };
    state.store.push_critique(critique.clone());

    tracing::info!(
        critique_id = %critique.critique_id,
        idea_id = %idea_id,
        agent_id = %author_agent_id,
        "Critique added"
    );
    state.record(
        FeedEventKind::CritiqueAdded,
        json!({ "critique_id": critique.critique_id, "idea_id": idea_id }),
    );

    Ok(critique)
}

/// Critiques on an idea in append order.
pub fn list_critiques(state: &PlaygroundState, idea_id: IdeaId) -> RoastResult<Vec<Critique>> {
    state.store.get_idea(idea_id)?;
    Ok(state.store.critiques_for(idea_id))
}

pub fn parse_direction(raw: &str) -> RoastResult<VoteDirection> {
    VoteDirection::from_db_str(raw)
        .map_err(|e| RoastError::invalid("direction", format!("{}; expected up or down", e)))
}

/// Upsert the caller's vote and return the tally observed with it.
pub fn cast_vote(
    state: &PlaygroundState,
    author_agent_id: AgentId,
    idea_id: IdeaId,
    request: &VoteRequest,
) -> RoastResult<VoteReceipt> {
    let direction = parse_direction(&request.direction)?;
    let rationale = state.clean(&request.rationale);
    check_content("rationale", &rationale)?;

    let idea = state.store.get_idea(idea_id)?;
    if !state.config.allow_self_vote && idea.author_agent_id == author_agent_id {
        return Err(RoastError::forbidden("agents may not vote on their own ideas"));
    }

    let vote = Vote {
        idea_id,
        author_agent_id,
        direction,
        rationale,
        updated_at: Utc::now(),
    };
    let tally = state.store.upsert_vote(vote.clone());

    tracing::info!(
        idea_id = %idea_id,
        agent_id = %author_agent_id,
        %direction,
        up = tally.up,
        down = tally.down,
        "Vote cast"
    );
    state.record(
        FeedEventKind::VoteCast,
        json!({ "idea_id": idea_id, "direction": direction.as_db_str(), "net": tally.net() }),
    );

    Ok(VoteReceipt { vote, tally })
}

pub fn tally(state: &PlaygroundState, idea_id: IdeaId) -> RoastResult<VoteTally> {
    state.store.get_idea(idea_id)?;
    Ok(state.store.tally(idea_id))
}

/// `up - down`, computed on read.
pub fn net_score(state: &PlaygroundState, idea_id: IdeaId) -> RoastResult<i64> {
    tally(state, idea_id).map(|t| t.net())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_service::{create_idea, create_problem};
    use crate::types::{CreateIdeaRequest, CreateProblemRequest};
    use roast_core::{ErrorKind, Idea, PlaygroundConfig};
    use roast_llm::CapabilityRouter;

    async fn seeded_idea(state: &PlaygroundState, author: AgentId) -> Idea {
        let problem = create_problem(
            state,
            author,
            &CreateProblemRequest {
                title: "Too many tabs".to_string(),
                description: "Browser uses all my memory".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create_idea(
            state,
            author,
            problem.problem_id,
            &CreateIdeaRequest {
                startup_name: "TabTamer".to_string(),
                pitch: "Closes tabs you will never read".to_string(),
                business_model: "Freemium".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn vote(direction: &str, rationale: &str) -> VoteRequest {
        VoteRequest {
            direction: direction.to_string(),
            rationale: rationale.to_string(),
        }
    }

    #[tokio::test]
    async fn test_revote_overwrites() {
        let state = PlaygroundState::in_memory();
        let voter = new_entity_id();
        let idea = seeded_idea(&state, new_entity_id()).await;

        let first = cast_vote(&state, voter, idea.idea_id, &vote("up", "love it")).unwrap();
        assert_eq!(first.tally, VoteTally { up: 1, down: 0 });

        let second = cast_vote(&state, voter, idea.idea_id, &vote("DOWN", "changed my mind")).unwrap();
        assert_eq!(second.tally, VoteTally { up: 0, down: 1 });

        let stored = state.store.votes_for(idea.idea_id);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].direction, VoteDirection::Down);
        assert_eq!(stored[0].rationale, "changed my mind");
        assert_eq!(net_score(&state, idea.idea_id).unwrap(), -1);
    }

    #[tokio::test]
    async fn test_invalid_direction_and_missing_idea() {
        let state = PlaygroundState::in_memory();
        let voter = new_entity_id();
        let idea = seeded_idea(&state, new_entity_id()).await;

        let err = cast_vote(&state, voter, idea.idea_id, &vote("sideways", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let err = cast_vote(&state, voter, new_entity_id(), &vote("up", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(state.store.vote_count(), 0);
    }

    #[tokio::test]
    async fn test_self_vote_policy() {
        let author = new_entity_id();

        let open = PlaygroundState::in_memory();
        let idea = seeded_idea(&open, author).await;
        assert!(cast_vote(&open, author, idea.idea_id, &vote("up", "")).is_ok());

        let config = PlaygroundConfig {
            allow_self_vote: false,
            ..Default::default()
        };
        let router = CapabilityRouter::heuristic_only(config.capability_timeout);
        let strict = PlaygroundState::new(config, router);
        let idea = seeded_idea(&strict, author).await;
        let err = cast_vote(&strict, author, idea.idea_id, &vote("up", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(cast_vote(&strict, new_entity_id(), idea.idea_id, &vote("up", "")).is_ok());
    }

    #[tokio::test]
    async fn test_critiques_append_in_order() {
        let state = PlaygroundState::in_memory();
        let critic = new_entity_id();
        let idea = seeded_idea(&state, new_entity_id()).await;

        add_critique(&state, critic, idea.idea_id, "Too niche").unwrap();
        add_critique(&state, critic, idea.idea_id, "Still too niche").unwrap();

        let critiques = list_critiques(&state, idea.idea_id).unwrap();
        assert_eq!(
            critiques.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["Too niche", "Still too niche"]
        );

        let err = add_critique(&state, critic, idea.idea_id, "   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        let err = add_critique(&state, critic, new_entity_id(), "Orphan").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
