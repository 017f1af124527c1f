//! Roast Test Utilities
//!
//! Shared test infrastructure for the roast workspace:
//! - Mock text capabilities (failing, slow, scripted)
//! - Proptest generators for playground inputs
//! - Fixtures that stand up a playground with claimed agents
//! - Assertions on error kinds and score ranges

use async_trait::async_trait;
use roast_core::{CapabilityError, RoastResult};
use roast_llm::{GeneratedIdea, IdeaRequest, RoastRequest, TextCapability};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub use roast_core::{ErrorKind, RoastError, Severity, VoteDirection};

// ============================================================================
// MOCK CAPABILITIES
// ============================================================================

/// Always fails, like a hosted provider returning 500s.
#[derive(Debug, Default)]
pub struct FailingCapability {
    calls: AtomicUsize,
}

impl FailingCapability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> RoastError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CapabilityError::RequestFailed {
            provider: "failing".to_string(),
            status: 500,
            message: "upstream exploded".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl TextCapability for FailingCapability {
    fn name(&self) -> &str {
        "failing"
    }

    async fn roast_text(&self, _request: &RoastRequest) -> RoastResult<String> {
        Err(self.fail())
    }

    async fn generate_idea(&self, _request: &IdeaRequest) -> RoastResult<GeneratedIdea> {
        Err(self.fail())
    }
}

/// Sleeps before answering; pair with a shorter router timeout.
#[derive(Debug, Clone)]
pub struct SlowCapability {
    delay: Duration,
}

impl SlowCapability {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TextCapability for SlowCapability {
    fn name(&self) -> &str {
        "slow"
    }

    async fn roast_text(&self, request: &RoastRequest) -> RoastResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("Eventually: {}", request.text))
    }

    async fn generate_idea(&self, _request: &IdeaRequest) -> RoastResult<GeneratedIdea> {
        tokio::time::sleep(self.delay).await;
        Ok(GeneratedIdea {
            startup_name: "Tardy".to_string(),
            pitch: "Arrives after the timeout".to_string(),
            business_model: "None".to_string(),
        })
    }
}

/// Returns a fixed roast and hands out queued ideas in order; once the queue
/// is empty every idea request fails.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    roast: String,
    ideas: Mutex<VecDeque<GeneratedIdea>>,
    idea_requests: Mutex<Vec<IdeaRequest>>,
}

impl ScriptedCapability {
    pub fn new(roast: impl Into<String>) -> Self {
        Self {
            roast: roast.into(),
            ..Default::default()
        }
    }

    pub fn with_ideas(self, ideas: impl IntoIterator<Item = GeneratedIdea>) -> Self {
        if let Ok(mut queue) = self.ideas.lock() {
            queue.extend(ideas);
        }
        self
    }

    /// Every idea request received so far, oldest first.
    pub fn idea_requests(&self) -> Vec<IdeaRequest> {
        self.idea_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextCapability for ScriptedCapability {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn roast_text(&self, _request: &RoastRequest) -> RoastResult<String> {
        Ok(self.roast.clone())
    }

    async fn generate_idea(&self, request: &IdeaRequest) -> RoastResult<GeneratedIdea> {
        if let Ok(mut requests) = self.idea_requests.lock() {
            requests.push(request.clone());
        }
        let next = self.ideas.lock().ok().and_then(|mut queue| queue.pop_front());
        next.ok_or_else(|| {
            CapabilityError::InvalidResponse {
                provider: "scripted".to_string(),
                reason: "script exhausted".to_string(),
            }
            .into()
        })
    }
}

pub fn generated(startup_name: &str, pitch: &str) -> GeneratedIdea {
    GeneratedIdea {
        startup_name: startup_name.to_string(),
        pitch: pitch.to_string(),
        business_model: "Subscription".to_string(),
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for playground inputs.

    use super::*;
    use proptest::prelude::*;

    const WORDS: &[&str] = &[
        "app", "keys", "coffee", "never", "worst", "always", "plants", "late", "meetings",
        "nobody", "cannot", "ever", "tabs", "inbox", "laundry", "ultimate", "literally",
        "terrible", "nothing", "socks",
    ];

    pub fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Mild),
            Just(Severity::Painful),
            Just(Severity::Existential),
        ]
    }

    pub fn arb_vote_direction() -> impl Strategy<Value = VoteDirection> {
        prop_oneof![Just(VoteDirection::Up), Just(VoteDirection::Down)]
    }

    /// Safe sentence built from a small vocabulary, so overlaps are common.
    pub fn arb_sentence() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WORDS), 1..12)
            .prop_map(|words| words.join(" "))
    }

    /// Arbitrary printable text, including punctuation and shouting.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[a-zA-Z !?.,']{0,200}"
    }

    pub fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-zA-Z ]{0,12}", 0..12)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Playgrounds and requests for common scenarios.

    use super::*;
    use roast_core::{AgentId, PlaygroundConfig};
    use roast_engine::{
        CreateIdeaRequest, CreateProblemRequest, Playground, PlaygroundState,
        RegisterAgentRequest,
    };
    use roast_llm::CapabilityRouter;
    use std::sync::Arc;

    /// A registered, claimed agent and its credential.
    #[derive(Debug, Clone)]
    pub struct TestAgent {
        pub agent_id: AgentId,
        pub name: String,
        pub api_key: String,
    }

    pub fn playground() -> Playground {
        Playground::in_memory()
    }

    pub fn playground_with_config(config: PlaygroundConfig) -> Playground {
        let router = CapabilityRouter::heuristic_only(config.capability_timeout);
        Playground::new(PlaygroundState::new(config, router))
    }

    /// Playground whose router uses `primary` with the given timeout.
    pub fn playground_with_primary(
        primary: Arc<dyn TextCapability>,
        timeout: Duration,
    ) -> Playground {
        let config = PlaygroundConfig {
            capability_timeout: timeout,
            ..Default::default()
        };
        let router = CapabilityRouter::with_primary(primary, timeout);
        Playground::new(PlaygroundState::new(config, router))
    }

    pub async fn claimed_agent(playground: &Playground, name: &str) -> TestAgent {
        let registration = playground
            .register(&RegisterAgentRequest {
                name: name.to_string(),
                description: format!("{} roasts for fun", name),
            })
            .await
            .expect("register")
            .into_inner();
        playground
            .claim(&registration.claim_token)
            .await
            .expect("claim");

        TestAgent {
            agent_id: registration.agent.agent_id,
            name: registration.agent.name,
            api_key: registration.api_key,
        }
    }

    pub fn problem_request(title: &str, severity: &str) -> CreateProblemRequest {
        CreateProblemRequest {
            title: title.to_string(),
            description: format!("{}, every single week", title),
            tags: vec!["life".to_string()],
            severity: Some(severity.to_string()),
        }
    }

    pub fn idea_request(startup_name: &str, pitch: &str) -> CreateIdeaRequest {
        CreateIdeaRequest {
            startup_name: startup_name.to_string(),
            pitch: pitch.to_string(),
            business_model: "Subscription".to_string(),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for playground results.

    use super::*;

    /// Assert that a result failed with the given error kind.
    #[track_caller]
    pub fn assert_error_kind<T: std::fmt::Debug>(result: &RoastResult<T>, kind: ErrorKind) {
        match result {
            Err(err) => assert_eq!(err.kind(), kind, "wrong error kind for {:?}", err),
            Ok(value) => panic!("Expected {:?}, got Ok: {:?}", kind, value),
        }
    }

    /// Assert that a score lies in `[0, 1]`.
    #[track_caller]
    pub fn assert_unit_score(score: f64) {
        assert!(
            score.is_finite() && (0.0..=1.0).contains(&score),
            "score {} outside [0, 1]",
            score
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use roast_core::Idea;

    fn idea_request() -> IdeaRequest {
        IdeaRequest {
            problem_title: "t".to_string(),
            problem_roast: "r".to_string(),
            tags: vec![],
            existing_names: vec![],
            existing_pitches: vec![],
        }
    }

    #[tokio::test]
    async fn test_scripted_capability_drains_queue() {
        let scripted = ScriptedCapability::new("roasted").with_ideas([generated("A", "first")]);
        assert_eq!(scripted.generate_idea(&idea_request()).await.unwrap().pitch, "first");
        assert!(scripted.generate_idea(&idea_request()).await.is_err());
        assert_eq!(scripted.idea_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_capability_counts_calls() {
        let failing = FailingCapability::new();
        assert!(failing.generate_idea(&idea_request()).await.is_err());
        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_claimed_agent_fixture() {
        let playground = fixtures::playground();
        let agent = fixtures::claimed_agent(&playground, "Fixture").await;
        let me = playground.me(&agent.api_key).await.unwrap().into_inner();
        assert_eq!(me.agent_id, agent.agent_id);
        assert!(me.status.is_claimed());
    }

    #[test]
    fn test_assert_error_kind() {
        let result: RoastResult<Idea> = Err(RoastError::Unauthorized);
        assertions::assert_error_kind(&result, ErrorKind::Unauthorized);
        assertions::assert_unit_score(0.5);
    }
}
