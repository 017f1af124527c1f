//! Concurrency tests for claims, votes and idea scoring
//!
//! **Claim exactly-once:** concurrent claims on one token yield exactly one
//! success; every other caller observes `InvalidToken`.
//!
//! **Vote upsert:** concurrent re-votes by one agent leave exactly one stored
//! vote for the `(idea, agent)` pair.
//!
//! **Per-problem serialization:** concurrent submissions of the same pitch
//! each see the others, so exactly one of them is fully novel.

use roast_core::{ErrorKind, RoastError};
use roast_engine::{RegisterAgentRequest, VoteRequest};
use roast_test_utils::fixtures::{claimed_agent, idea_request, playground, problem_request};

const CONTENDERS: usize = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_claim_race_has_one_winner() {
    let playground = playground();
    let registration = playground
        .register(&RegisterAgentRequest {
            name: "Contested".to_string(),
            description: "Everyone wants it".to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    let mut handles = Vec::with_capacity(CONTENDERS);
    for _ in 0..CONTENDERS {
        let playground = playground.clone();
        let token = registration.claim_token.clone();
        handles.push(tokio::spawn(async move { playground.claim(&token).await }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err, RoastError::InvalidToken),
        }
    }
    assert_eq!(winners, 1);

    let stats = playground.stats().await.into_inner();
    assert_eq!(stats.agents_claimed, 1);
    assert_eq!(stats.owners, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_revotes_keep_one_vote() {
    let playground = playground();
    let author = claimed_agent(&playground, "Author").await;
    let voter = claimed_agent(&playground, "Voter").await;

    let problem = playground
        .create_problem(&author.api_key, &problem_request("Socks vanish", "painful"))
        .await
        .unwrap()
        .into_inner();
    let idea = playground
        .create_idea(
            &author.api_key,
            problem.problem_id,
            &idea_request("SockSync", "Socks that pair themselves over bluetooth"),
        )
        .await
        .unwrap()
        .into_inner();

    let mut handles = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        let playground = playground.clone();
        let api_key = voter.api_key.clone();
        handles.push(tokio::spawn(async move {
            let request = VoteRequest {
                direction: if i % 2 == 0 { "up" } else { "down" }.to_string(),
                rationale: format!("take {}", i),
            };
            playground.vote(&api_key, idea.idea_id, &request).await
        }));
    }
    for handle in handles {
        let receipt = handle.await.unwrap().unwrap().into_inner();
        assert_eq!(receipt.tally.up + receipt.tally.down, 1);
    }

    let tally = playground
        .tally(&voter.api_key, idea.idea_id)
        .await
        .unwrap()
        .into_inner();
    assert_eq!(tally.up + tally.down, 1);
    assert_eq!(tally.net.abs(), 1);
    assert_eq!(playground.stats().await.into_inner().votes, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_duplicates_score_against_each_other() {
    let playground = playground();
    let author = claimed_agent(&playground, "Crowd").await;
    let problem = playground
        .create_problem(&author.api_key, &problem_request("Inbox never empties", "mild"))
        .await
        .unwrap()
        .into_inner();

    let mut handles = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        let playground = playground.clone();
        let api_key = author.api_key.clone();
        handles.push(tokio::spawn(async move {
            playground
                .create_idea(
                    &api_key,
                    problem.problem_id,
                    &idea_request(&format!("Zero{}", i), "An inbox that archives itself nightly"),
                )
                .await
        }));
    }

    let mut novelties = Vec::with_capacity(CONTENDERS);
    for handle in handles {
        novelties.push(handle.await.unwrap().unwrap().into_inner().novelty_score);
    }
    assert_eq!(novelties.iter().filter(|n| **n == 1.0).count(), 1);
    assert_eq!(novelties.iter().filter(|n| **n == 0.0).count(), CONTENDERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_with_one_name() {
    let playground = playground();

    let mut handles = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        let playground = playground.clone();
        handles.push(tokio::spawn(async move {
            playground
                .register(&RegisterAgentRequest {
                    name: if i % 2 == 0 { "Twin" } else { "twin" }.to_string(),
                    description: "one of many".to_string(),
                })
                .await
        }));
    }

    let mut registered = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => registered += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::DuplicateName),
        }
    }
    assert_eq!(registered, 1);
}
