//! Auto-brainstorm: generate ideas for a problem and score them in sequence.

use roast_core::{AgentId, FeedEventKind, Idea, IdeaSource, Problem, ProblemId, RoastError, RoastResult};
use roast_llm::{GeneratedIdea, HeuristicCapability, IdeaRequest};
use serde_json::json;

use crate::moderation::{flag_reason, sanitize};
use crate::services::content_service::insert_scored_idea;
use crate::state::PlaygroundState;
use crate::types::IdeaDraft;

const MAX_STARTUP_NAME_LEN: usize = 80;

/// Generate `count` ideas on a problem.
///
/// Each member is generated against a fresh snapshot of the problem's ideas,
/// outside the problem lock, and then scored under the lock against every
/// prior idea, earlier batch members included.
pub async fn auto_brainstorm(
    state: &PlaygroundState,
    author_agent_id: AgentId,
    problem_id: ProblemId,
    count: i64,
) -> RoastResult<Vec<Idea>> {
    let max = state.config.max_brainstorm_count;
    if count < 1 || count > max as i64 {
        return Err(RoastError::InvalidCount {
            requested: count,
            max,
        });
    }

    let problem = state.store.get_problem(problem_id)?;
    let mut ideas = Vec::with_capacity(count as usize);

    for ordinal in 0..count {
        let request = idea_request(state, &problem);
        let generated = state.router.generate_idea(&request).await;
        let draft = accept_or_fallback(state, &request, generated);

        let idea = insert_scored_idea(state, &problem, author_agent_id, draft).await?;
        tracing::debug!(
            idea_id = %idea.idea_id,
            ordinal,
            novelty_score = idea.novelty_score,
            "Brainstormed idea stored"
        );
        state.record(
            FeedEventKind::IdeaAutoGenerated,
            json!({
                "idea_id": idea.idea_id,
                "problem_id": problem_id,
                "startup_name": idea.startup_name,
            }),
        );
        ideas.push(idea);
    }

    tracing::info!(
        problem_id = %problem_id,
        agent_id = %author_agent_id,
        count,
        provider = state.router.primary_name(),
        "Auto-brainstorm complete"
    );
    Ok(ideas)
}

fn idea_request(state: &PlaygroundState, problem: &Problem) -> IdeaRequest {
    let existing = state.store.ideas_for_problem(problem.problem_id);
    IdeaRequest {
        problem_title: problem.title.clone(),
        problem_roast: problem.roast_description.clone(),
        tags: problem.tags.iter().cloned().collect(),
        existing_names: existing.iter().map(|i| i.startup_name.clone()).collect(),
        existing_pitches: existing.into_iter().map(|i| i.pitch).collect(),
    }
}

/// Sanitize generated content; blank or flagged output is replaced by the
/// heuristic's idea for the same request.
fn accept_or_fallback(
    state: &PlaygroundState,
    request: &IdeaRequest,
    generated: GeneratedIdea,
) -> IdeaDraft {
    let draft = clean_draft(state, generated);
    if usable(&draft) {
        return draft;
    }

    tracing::warn!(
        problem = %request.problem_title,
        "Generated idea was blank or flagged, using heuristic idea"
    );
    clean_draft(state, HeuristicCapability::new().idea(request))
}

fn clean_draft(state: &PlaygroundState, generated: GeneratedIdea) -> IdeaDraft {
    IdeaDraft {
        startup_name: sanitize(&generated.startup_name, MAX_STARTUP_NAME_LEN),
        pitch: state.clean(&generated.pitch),
        business_model: state.clean(&generated.business_model),
        source: IdeaSource::Auto,
    }
}

fn usable(draft: &IdeaDraft) -> bool {
    !draft.startup_name.is_empty()
        && !draft.pitch.is_empty()
        && [&draft.startup_name, &draft.pitch, &draft.business_model]
            .iter()
            .all(|text| flag_reason(text).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_service::create_problem;
    use crate::types::CreateProblemRequest;
    use roast_core::{new_entity_id, ErrorKind};

    async fn posted_problem(state: &PlaygroundState) -> Problem {
        let request = CreateProblemRequest {
            title: "Always late to meetings".to_string(),
            description: "Calendars ignore me and I ignore them right back".to_string(),
            tags: vec!["productivity".to_string()],
            severity: Some("painful".to_string()),
        };
        create_problem(state, new_entity_id(), &request).await.unwrap()
    }

    #[tokio::test]
    async fn test_count_bounds() {
        let state = PlaygroundState::in_memory();
        let problem = posted_problem(&state).await;
        let author = new_entity_id();

        for count in [0, -1, 4] {
            let err = auto_brainstorm(&state, author, problem.problem_id, count)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidCount);
        }
        assert!(state.store.ideas_for_problem(problem.problem_id).is_empty());
    }

    #[tokio::test]
    async fn test_batch_members_score_against_each_other() {
        let state = PlaygroundState::in_memory();
        let problem = posted_problem(&state).await;

        let ideas = auto_brainstorm(&state, new_entity_id(), problem.problem_id, 3)
            .await
            .unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].novelty_score, 1.0);
        assert!(ideas.iter().all(|i| i.source == IdeaSource::Auto));
        assert!(ideas
            .iter()
            .all(|i| (0.0..=1.0).contains(&i.novelty_score) && (0.0..=1.0).contains(&i.roast_score)));

        let priors: Vec<&str> = ideas[..2].iter().map(|i| i.pitch.as_str()).collect();
        assert_eq!(
            ideas[2].novelty_score,
            crate::scoring::novelty(&ideas[2].pitch, &priors)
        );
    }

    #[tokio::test]
    async fn test_missing_problem() {
        let state = PlaygroundState::in_memory();
        let err = auto_brainstorm(&state, new_entity_id(), new_entity_id(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_flagged_generation_is_replaced() {
        let state = PlaygroundState::in_memory();
        let request = IdeaRequest {
            problem_title: "Lost keys".to_string(),
            problem_roast: "You lose keys".to_string(),
            tags: vec![],
            existing_names: vec![],
            existing_pitches: vec![],
        };
        let flagged = GeneratedIdea {
            startup_name: "HateCo".to_string(),
            pitch: "We hate keys".to_string(),
            business_model: "Ads".to_string(),
        };
        let draft = accept_or_fallback(&state, &request, flagged);
        assert_eq!(draft.pitch, HeuristicCapability::new().idea(&request).pitch);
        assert_eq!(draft.source, IdeaSource::Auto);
    }
}
