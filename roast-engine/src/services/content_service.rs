//! Content Store operations: problems and ideas.

use chrono::Utc;
use roast_core::{
    new_entity_id, AgentId, FeedEventKind, Idea, IdeaId, IdeaSource, Problem, ProblemId,
    ProblemWithIdeas, RoastError, RoastResult, Severity,
};
use serde_json::json;

use crate::moderation::{check_content, normalize_tags, required_text};
use crate::scoring;
use crate::state::PlaygroundState;
use crate::types::{CreateIdeaRequest, CreateProblemRequest, IdeaDraft};

const MAX_TAG_LEN: usize = 40;
const MAX_STARTUP_NAME_LEN: usize = 80;

/// Parse an optional severity; absent or blank means `mild`.
pub fn parse_severity(raw: Option<&str>) -> RoastResult<Severity> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Severity::default()),
        Some(value) => Severity::from_db_str(value).map_err(|e| {
            RoastError::invalid("severity", format!("{}; expected mild, painful or existential", e))
        }),
    }
}

// ============================================================================
// PROBLEMS
// ============================================================================

/// Create a problem with its roast computed synchronously.
pub async fn create_problem(
    state: &PlaygroundState,
    author_agent_id: AgentId,
    request: &CreateProblemRequest,
) -> RoastResult<Problem> {
    let max_len = state.config.max_text_len;
    let title = required_text("title", &request.title, max_len)?;
    let description = required_text("description", &request.description, max_len)?;
    check_content("title", &title)?;
    check_content("description", &description)?;

    let severity = parse_severity(request.severity.as_deref())?;
    let tags = normalize_tags(&request.tags, state.config.max_tags, MAX_TAG_LEN);
    let tag_list: Vec<String> = tags.iter().cloned().collect();

    let roast = scoring::roast(
        &state.router,
        &format!("{}. {}", title.trim_end_matches('.'), description),
        severity,
        &tag_list,
        max_len,
    )
    .await;

    let problem = Problem {
        problem_id: new_entity_id(),
        title,
        description,
        roast_description: roast.roast_text,
        roast_score: roast.roast_score,
        tags,
        severity,
        author_agent_id,
        created_at: Utc::now(),
    };
    state.store.insert_problem(problem.clone());

    tracing::info!(
        problem_id = %problem.problem_id,
        agent_id = %author_agent_id,
        %severity,
        roast_score = problem.roast_score,
        "Problem posted"
    );
    state.record(
        FeedEventKind::ProblemPosted,
        json!({
            "problem_id": problem.problem_id,
            "title": problem.title,
            "severity": severity.as_db_str(),
        }),
    );

    Ok(problem)
}

pub fn get_problem(state: &PlaygroundState, problem_id: ProblemId) -> RoastResult<ProblemWithIdeas> {
    let problem = state.store.get_problem(problem_id)?;
    let ideas = state.store.ideas_for_problem(problem_id);
    Ok(ProblemWithIdeas { problem, ideas })
}

/// Newest problems first.
pub fn list_problems(state: &PlaygroundState, limit: Option<usize>) -> Vec<Problem> {
    let mut problems = state.store.list_problems();
    problems.sort_by(|a, b| {
        (b.created_at, b.problem_id).cmp(&(a.created_at, a.problem_id))
    });
    problems.truncate(state.config.clamp_limit(limit));
    problems
}

// ============================================================================
// IDEAS
// ============================================================================

/// Validate a manual idea submission.
pub fn draft_from_request(
    state: &PlaygroundState,
    request: &CreateIdeaRequest,
) -> RoastResult<IdeaDraft> {
    let max_len = state.config.max_text_len;
    let startup_name = required_text("startup_name", &request.startup_name, MAX_STARTUP_NAME_LEN)?;
    let pitch = required_text("pitch", &request.pitch, max_len)?;
    let business_model = state.clean(&request.business_model);
    check_content("startup_name", &startup_name)?;
    check_content("pitch", &pitch)?;
    check_content("business_model", &business_model)?;

    Ok(IdeaDraft {
        startup_name,
        pitch,
        business_model,
        source: IdeaSource::Manual,
    })
}

/// Score and store an idea.
///
/// The problem lock is held from reading the prior ideas until the new idea
/// is stored, so concurrent submissions on one problem always score against
/// each other. Nothing inside the lock awaits anything but the lock itself.
pub async fn insert_scored_idea(
    state: &PlaygroundState,
    problem: &Problem,
    author_agent_id: AgentId,
    draft: IdeaDraft,
) -> RoastResult<Idea> {
    let roast_score = scoring::roast_score(&draft.pitch, problem.severity);

    let lock = state.store.problem_lock(problem.problem_id);
    let _guard = lock.lock().await;

    let priors: Vec<String> = state
        .store
        .ideas_for_problem(problem.problem_id)
        .into_iter()
        .map(|idea| idea.pitch)
        .collect();
    let novelty_score = scoring::novelty(&draft.pitch, &priors);

    let idea = Idea {
        idea_id: new_entity_id(),
        problem_id: problem.problem_id,
        startup_name: draft.startup_name,
        pitch: draft.pitch,
        business_model: draft.business_model,
        author_agent_id,
        novelty_score,
        roast_score,
        source: draft.source,
        created_at: Utc::now(),
    };
    state.store.insert_idea(idea.clone())?;

    tracing::debug!(
        idea_id = %idea.idea_id,
        priors = priors.len(),
        novelty_score,
        roast_score,
        "Idea scored"
    );
    Ok(idea)
}

pub async fn create_idea(
    state: &PlaygroundState,
    author_agent_id: AgentId,
    problem_id: ProblemId,
    request: &CreateIdeaRequest,
) -> RoastResult<Idea> {
    let draft = draft_from_request(state, request)?;
    let problem = state.store.get_problem(problem_id)?;

    let idea = insert_scored_idea(state, &problem, author_agent_id, draft).await?;

    tracing::info!(
        idea_id = %idea.idea_id,
        problem_id = %problem_id,
        agent_id = %author_agent_id,
        novelty_score = idea.novelty_score,
        "Idea submitted"
    );
    state.record(
        FeedEventKind::IdeaSubmitted,
        json!({
            "idea_id": idea.idea_id,
            "problem_id": problem_id,
            "startup_name": idea.startup_name,
        }),
    );

    Ok(idea)
}

pub fn get_idea(state: &PlaygroundState, idea_id: IdeaId) -> RoastResult<Idea> {
    state.store.get_idea(idea_id)
}

/// Ideas on one problem in creation order.
pub fn list_ideas_for_problem(state: &PlaygroundState, problem_id: ProblemId) -> RoastResult<Vec<Idea>> {
    state.store.get_problem(problem_id)?;
    Ok(state.store.ideas_for_problem(problem_id))
}

pub fn list_all_ideas(state: &PlaygroundState) -> Vec<Idea> {
    state.store.list_all_ideas()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use roast_core::{EntityType, ErrorKind};

    fn problem_request(severity: Option<&str>) -> CreateProblemRequest {
        CreateProblemRequest {
            title: "Forgets to water plants".to_string(),
            description: "Every single plant I own is dead within a month".to_string(),
            tags: vec!["Plants".to_string(), "home".to_string()],
            severity: severity.map(String::from),
        }
    }

    fn idea_request(pitch: &str) -> CreateIdeaRequest {
        CreateIdeaRequest {
            startup_name: "PlantPal".to_string(),
            pitch: pitch.to_string(),
            business_model: "Subscription".to_string(),
        }
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity(None).unwrap(), Severity::Mild);
        assert_eq!(parse_severity(Some("  ")).unwrap(), Severity::Mild);
        assert_eq!(parse_severity(Some("annoying")).unwrap(), Severity::Mild);
        assert_eq!(parse_severity(Some("Existential")).unwrap(), Severity::Existential);
        let err = parse_severity(Some("apocalyptic")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_create_problem_populates_roast() {
        let state = PlaygroundState::in_memory();
        let author = new_entity_id();
        let problem = create_problem(&state, author, &problem_request(Some("painful")))
            .await
            .unwrap();
        assert!(!problem.roast_description.is_empty());
        assert!(problem.roast_score > 0.0 && problem.roast_score <= 1.0);
        assert!(problem.tags.contains("plants"));
        assert_eq!(problem.severity, Severity::Painful);
    }

    #[tokio::test]
    async fn test_create_problem_validation() {
        let state = PlaygroundState::in_memory();
        let author = new_entity_id();

        let mut missing = problem_request(None);
        missing.title = "  ".to_string();
        let err = create_problem(&state, author, &missing).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let mut flagged = problem_request(None);
        flagged.description = "My religious neighbour".to_string();
        let err = create_problem(&state, author, &flagged).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContentFlagged);

        let err = create_problem(&state, author, &problem_request(Some("spicy")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(state.store.problem_count(), 0);
    }

    #[tokio::test]
    async fn test_first_idea_is_fully_novel_and_duplicates_are_not() {
        let state = PlaygroundState::in_memory();
        let author = new_entity_id();
        let problem = create_problem(&state, author, &problem_request(None)).await.unwrap();

        let pitch = "An app that nags you to water plants";
        let first = create_idea(&state, author, problem.problem_id, &idea_request(pitch))
            .await
            .unwrap();
        assert_eq!(first.novelty_score, 1.0);

        let second = create_idea(&state, author, problem.problem_id, &idea_request(pitch))
            .await
            .unwrap();
        assert_eq!(second.novelty_score, 0.0);
        assert!(second.novelty_score <= first.novelty_score);

        // Past scores are never recomputed.
        assert_eq!(get_idea(&state, first.idea_id).unwrap().novelty_score, 1.0);

        let listed = list_ideas_for_problem(&state, problem.problem_id).unwrap();
        assert_eq!(
            listed.iter().map(|i| i.idea_id).collect::<Vec<_>>(),
            vec![first.idea_id, second.idea_id]
        );
    }

    #[tokio::test]
    async fn test_create_idea_for_missing_problem() {
        let state = PlaygroundState::in_memory();
        let err = create_idea(&state, new_entity_id(), new_entity_id(), &idea_request("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RoastError::NotFound {
                entity_type: EntityType::Problem,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_problems_newest_first_and_clamped() {
        let state = PlaygroundState::in_memory();
        let author = new_entity_id();
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(
                create_problem(&state, author, &problem_request(None))
                    .await
                    .unwrap()
                    .problem_id,
            );
        }

        let listed = list_problems(&state, Some(2));
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].problem_id, ids[2]);
        assert_eq!(listed[1].problem_id, ids[1]);

        let with_ideas = get_problem(&state, ids[0]).unwrap();
        assert!(with_ideas.ideas.is_empty());
    }
}
