//! Auto-brainstorm against misbehaving text capabilities
//!
//! Generation never fails because of the capability: errors, timeouts,
//! blank and flagged output all fall back to the deterministic heuristic.

use roast_core::{IdeaSource, RoastResult};
use roast_llm::HeuristicCapability;
use roast_test_utils::fixtures::{claimed_agent, playground_with_primary, problem_request};
use roast_test_utils::{generated, FailingCapability, ScriptedCapability, SlowCapability};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_failing_capability_falls_back() -> RoastResult<()> {
    let failing = Arc::new(FailingCapability::new());
    let playground = playground_with_primary(failing.clone(), Duration::from_secs(1));
    let agent = claimed_agent(&playground, "Resilient").await;

    let problem = playground
        .create_problem(&agent.api_key, &problem_request("Printer jams", "painful"))
        .await?
        .into_inner();
    assert!(!problem.roast_description.is_empty());

    let ideas = playground
        .auto_brainstorm(&agent.api_key, problem.problem_id, 3)
        .await?
        .into_inner();
    assert_eq!(ideas.len(), 3);
    assert!(ideas.iter().all(|idea| idea.source == IdeaSource::Auto));
    assert!(ideas.iter().all(|idea| !idea.pitch.is_empty()));

    // One roast plus three ideas, every one served by the fallback.
    let usage = playground.state().router.usage();
    assert_eq!(failing.calls(), 4);
    assert_eq!(usage.fallbacks(), 4);
    assert_eq!(usage.primary_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_slow_capability_is_bounded_by_timeout() -> RoastResult<()> {
    let slow = Arc::new(SlowCapability::new(Duration::from_secs(30)));
    let playground = playground_with_primary(slow, Duration::from_millis(50));
    let agent = claimed_agent(&playground, "Impatient").await;

    let started = Instant::now();
    let problem = playground
        .create_problem(&agent.api_key, &problem_request("Queue at the bakery", "mild"))
        .await?
        .into_inner();
    let ideas = playground
        .auto_brainstorm(&agent.api_key, problem.problem_id, 2)
        .await?
        .into_inner();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(ideas.len(), 2);
    assert!(ideas.iter().all(|idea| idea.startup_name != "Tardy"));
    Ok(())
}

#[tokio::test]
async fn test_scripted_ideas_see_earlier_batch_members() -> RoastResult<()> {
    let scripted = Arc::new(
        ScriptedCapability::new("A roast written by the script").with_ideas([
            generated("NapPod", "Rentable nap pods next to every meeting room"),
            generated("HateCo", "We hate meetings"),
        ]),
    );
    let playground = playground_with_primary(scripted.clone(), Duration::from_secs(1));
    let agent = claimed_agent(&playground, "Scripted").await;

    let problem = playground
        .create_problem(&agent.api_key, &problem_request("Back to back meetings", "existential"))
        .await?
        .into_inner();
    assert_eq!(problem.roast_description, "A roast written by the script");

    let ideas = playground
        .auto_brainstorm(&agent.api_key, problem.problem_id, 3)
        .await?
        .into_inner();
    assert_eq!(ideas.len(), 3);
    assert_eq!(ideas[0].startup_name, "NapPod");
    assert_eq!(ideas[0].novelty_score, 1.0);

    // The flagged second idea and the exhausted third are both replaced.
    let requests = scripted.idea_requests();
    assert_eq!(requests.len(), 3);
    let heuristic = HeuristicCapability::new();
    assert_eq!(ideas[1].pitch, heuristic.idea(&requests[1]).pitch);
    assert_eq!(ideas[2].pitch, heuristic.idea(&requests[2]).pitch);

    assert!(requests[0].existing_pitches.is_empty());
    assert_eq!(requests[1].existing_pitches, vec![ideas[0].pitch.clone()]);
    assert_eq!(requests[2].existing_pitches.len(), 2);
    assert_eq!(requests[2].existing_names[0], "NapPod");
    Ok(())
}
