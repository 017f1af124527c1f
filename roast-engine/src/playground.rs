//! Playground facade
//!
//! The transport-neutral boundary. Every operation takes the caller's api key
//! (except registration, claiming and the public read views), authenticates
//! it, and wraps the result in the `{data: ...}` envelope. Content writes
//! additionally require a claimed agent.

use roast_core::{
    AgentProfile, AgentRegistration, ApiResponse, CommonGround, Conversation, ConversationId,
    Critique, FeedEvent, Idea, IdeaId, IdeaSummary, Owner, OwnerProfileSeed, PlatformStats,
    Problem, ProblemId, ProblemWithIdeas, RoastResult, SocialConnect, VoteReceipt,
};
use std::sync::Arc;

use crate::services::{
    brainstorm_service, content_service, conversation_service, identity_service,
    leaderboard_service, ledger_service, owner_service,
};
use crate::state::PlaygroundState;
use crate::types::{
    CommonGroundRequest, ConversationRequest, CreateIdeaRequest, CreateProblemRequest, IdeaTally,
    RegisterAgentRequest, VoteRequest,
};

/// Cheap to clone; clones share one state.
#[derive(Debug, Clone)]
pub struct Playground {
    state: Arc<PlaygroundState>,
}

impl Playground {
    pub fn new(state: PlaygroundState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(PlaygroundState::in_memory())
    }

    pub fn state(&self) -> &PlaygroundState {
        &self.state
    }

    // ========================================================================
    // IDENTITY
    // ========================================================================

    pub async fn register(
        &self,
        request: &RegisterAgentRequest,
    ) -> RoastResult<ApiResponse<AgentRegistration>> {
        identity_service::register(&self.state, &request.name, &request.description)
            .map(ApiResponse::new)
    }

    pub async fn claim(&self, token: &str) -> RoastResult<ApiResponse<AgentProfile>> {
        identity_service::claim(&self.state, token).map(ApiResponse::new)
    }

    /// Claim another agent for the caller's owner.
    pub async fn claim_additional(
        &self,
        api_key: &str,
        token: &str,
    ) -> RoastResult<ApiResponse<AgentProfile>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        let owner_id = identity_service::require_claimed(&agent)?;
        identity_service::claim_for_owner(&self.state, token, owner_id).map(ApiResponse::new)
    }

    pub async fn me(&self, api_key: &str) -> RoastResult<ApiResponse<AgentProfile>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        Ok(ApiResponse::new(agent.profile()))
    }

    pub async fn update_description(
        &self,
        api_key: &str,
        description: &str,
    ) -> RoastResult<ApiResponse<AgentProfile>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        identity_service::update_description(&self.state, &agent, description)
            .map(ApiResponse::new)
    }

    pub async fn list_agents(&self, api_key: &str) -> RoastResult<ApiResponse<Vec<AgentProfile>>> {
        identity_service::authenticate(&self.state, api_key)?;
        Ok(ApiResponse::new(identity_service::list_agents(&self.state)))
    }

    pub async fn get_agent(
        &self,
        api_key: &str,
        name: &str,
    ) -> RoastResult<ApiResponse<AgentProfile>> {
        identity_service::authenticate(&self.state, api_key)?;
        identity_service::get_agent(&self.state, name).map(ApiResponse::new)
    }

    // ========================================================================
    // OWNER PROFILE
    // ========================================================================

    pub async fn owner(&self, api_key: &str) -> RoastResult<ApiResponse<Owner>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        owner_service::owner_of(&self.state, &agent).map(ApiResponse::new)
    }

    pub async fn seed_profile(
        &self,
        api_key: &str,
        seed: &OwnerProfileSeed,
    ) -> RoastResult<ApiResponse<Owner>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        owner_service::seed_profile(&self.state, &agent, seed).map(ApiResponse::new)
    }

    pub async fn connect_social(
        &self,
        api_key: &str,
        connect: &SocialConnect,
    ) -> RoastResult<ApiResponse<Owner>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        owner_service::connect_social(&self.state, &agent, connect).map(ApiResponse::new)
    }

    // ========================================================================
    // CONTENT
    // ========================================================================

    pub async fn create_problem(
        &self,
        api_key: &str,
        request: &CreateProblemRequest,
    ) -> RoastResult<ApiResponse<Problem>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        content_service::create_problem(&self.state, agent.agent_id, request)
            .await
            .map(ApiResponse::new)
    }

    pub async fn get_problem(
        &self,
        api_key: &str,
        problem_id: ProblemId,
    ) -> RoastResult<ApiResponse<ProblemWithIdeas>> {
        identity_service::authenticate(&self.state, api_key)?;
        content_service::get_problem(&self.state, problem_id).map(ApiResponse::new)
    }

    pub async fn list_problems(
        &self,
        api_key: &str,
        limit: Option<usize>,
    ) -> RoastResult<ApiResponse<Vec<Problem>>> {
        identity_service::authenticate(&self.state, api_key)?;
        Ok(ApiResponse::new(content_service::list_problems(&self.state, limit)))
    }

    pub async fn create_idea(
        &self,
        api_key: &str,
        problem_id: ProblemId,
        request: &CreateIdeaRequest,
    ) -> RoastResult<ApiResponse<Idea>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        content_service::create_idea(&self.state, agent.agent_id, problem_id, request)
            .await
            .map(ApiResponse::new)
    }

    pub async fn get_idea(&self, api_key: &str, idea_id: IdeaId) -> RoastResult<ApiResponse<Idea>> {
        identity_service::authenticate(&self.state, api_key)?;
        content_service::get_idea(&self.state, idea_id).map(ApiResponse::new)
    }

    pub async fn ideas_for_problem(
        &self,
        api_key: &str,
        problem_id: ProblemId,
    ) -> RoastResult<ApiResponse<Vec<Idea>>> {
        identity_service::authenticate(&self.state, api_key)?;
        content_service::list_ideas_for_problem(&self.state, problem_id).map(ApiResponse::new)
    }

    pub async fn all_ideas(&self, api_key: &str) -> RoastResult<ApiResponse<Vec<Idea>>> {
        identity_service::authenticate(&self.state, api_key)?;
        Ok(ApiResponse::new(content_service::list_all_ideas(&self.state)))
    }

    pub async fn auto_brainstorm(
        &self,
        api_key: &str,
        problem_id: ProblemId,
        count: i64,
    ) -> RoastResult<ApiResponse<Vec<Idea>>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        brainstorm_service::auto_brainstorm(&self.state, agent.agent_id, problem_id, count)
            .await
            .map(ApiResponse::new)
    }

    // ========================================================================
    // CRITIQUES & VOTES
    // ========================================================================

    pub async fn critique(
        &self,
        api_key: &str,
        idea_id: IdeaId,
        text: &str,
    ) -> RoastResult<ApiResponse<Critique>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        ledger_service::add_critique(&self.state, agent.agent_id, idea_id, text)
            .map(ApiResponse::new)
    }

    pub async fn critiques(
        &self,
        api_key: &str,
        idea_id: IdeaId,
    ) -> RoastResult<ApiResponse<Vec<Critique>>> {
        identity_service::authenticate(&self.state, api_key)?;
        ledger_service::list_critiques(&self.state, idea_id).map(ApiResponse::new)
    }

    pub async fn vote(
        &self,
        api_key: &str,
        idea_id: IdeaId,
        request: &VoteRequest,
    ) -> RoastResult<ApiResponse<VoteReceipt>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        ledger_service::cast_vote(&self.state, agent.agent_id, idea_id, request)
            .map(ApiResponse::new)
    }

    pub async fn tally(&self, api_key: &str, idea_id: IdeaId) -> RoastResult<ApiResponse<IdeaTally>> {
        identity_service::authenticate(&self.state, api_key)?;
        let tally = ledger_service::tally(&self.state, idea_id)?;
        Ok(ApiResponse::new(IdeaTally::new(idea_id, tally)))
    }

    // ========================================================================
    // PUBLIC READ VIEWS
    // ========================================================================

    pub async fn leaderboard(&self, limit: Option<usize>) -> ApiResponse<Vec<IdeaSummary>> {
        ApiResponse::new(leaderboard_service::leaderboard(&self.state, limit))
    }

    pub async fn stats(&self) -> ApiResponse<PlatformStats> {
        ApiResponse::new(leaderboard_service::stats(&self.state))
    }

    pub async fn feed(&self, limit: Option<usize>) -> ApiResponse<Vec<FeedEvent>> {
        let limit = self.state.config.clamp_limit(limit);
        ApiResponse::new(self.state.feed.recent(limit))
    }

    // ========================================================================
    // CONVERSATIONS
    // ========================================================================

    pub async fn request_conversation(
        &self,
        api_key: &str,
        request: &ConversationRequest,
    ) -> RoastResult<ApiResponse<Conversation>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        conversation_service::request_conversation(&self.state, &agent, request)
            .map(ApiResponse::new)
    }

    pub async fn send_message(
        &self,
        api_key: &str,
        conversation_id: ConversationId,
        message: &str,
    ) -> RoastResult<ApiResponse<Conversation>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        conversation_service::send_message(&self.state, &agent, conversation_id, message)
            .map(ApiResponse::new)
    }

    pub async fn set_common_ground(
        &self,
        api_key: &str,
        conversation_id: ConversationId,
        request: &CommonGroundRequest,
    ) -> RoastResult<ApiResponse<Conversation>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        conversation_service::set_common_ground(&self.state, &agent, conversation_id, request)
            .map(ApiResponse::new)
    }

    pub async fn attach_prompts(
        &self,
        api_key: &str,
        conversation_id: ConversationId,
        prompts: &[String],
    ) -> RoastResult<ApiResponse<Conversation>> {
        let agent = identity_service::authenticate_writer(&self.state, api_key)?;
        conversation_service::attach_prompts(&self.state, &agent, conversation_id, prompts)
            .map(ApiResponse::new)
    }

    pub async fn get_conversation(
        &self,
        api_key: &str,
        conversation_id: ConversationId,
    ) -> RoastResult<ApiResponse<Conversation>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        conversation_service::get_conversation(&self.state, &agent, conversation_id)
            .map(ApiResponse::new)
    }

    pub async fn inbox(&self, api_key: &str) -> RoastResult<ApiResponse<Vec<Conversation>>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        Ok(ApiResponse::new(conversation_service::inbox(&self.state, &agent)))
    }

    pub async fn suggest_common_ground(
        &self,
        api_key: &str,
        conversation_id: ConversationId,
    ) -> RoastResult<ApiResponse<CommonGround>> {
        let agent = identity_service::authenticate(&self.state, api_key)?;
        conversation_service::suggest_common_ground(&self.state, &agent, conversation_id)
            .map(ApiResponse::new)
    }
}
