//! In-memory content store
//!
//! Shared substrate for every service. Each map is a `DashMap`, so operations
//! on different keys never contend. Multi-step invariants are enforced with
//! the entry API (one shard lock held for the read-modify-write) or with the
//! per-problem idea lock.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use roast_core::{
    Agent, AgentId, Conversation, ConversationId, Critique, EntityType, Idea, IdeaId, Owner,
    OwnerId, Problem, ProblemId, RoastError, RoastResult, Vote, VoteTally,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-lifetime store of every playground entity.
#[derive(Default)]
pub struct ContentStore {
    agents: DashMap<AgentId, Agent>,
    /// Lowercased name -> agent.
    agent_names: DashMap<String, AgentId>,
    /// Api key digest -> agent.
    api_keys: DashMap<String, AgentId>,
    /// Claim token digest -> agent. Entries are removed on claim.
    claim_tokens: DashMap<String, AgentId>,
    owners: DashMap<OwnerId, Owner>,
    problems: DashMap<ProblemId, Problem>,
    ideas: DashMap<IdeaId, Idea>,
    /// Idea ids per problem in creation order.
    problem_ideas: DashMap<ProblemId, Vec<IdeaId>>,
    problem_locks: DashMap<ProblemId, Arc<Mutex<()>>>,
    critiques: DashMap<IdeaId, Vec<Critique>>,
    votes: DashMap<IdeaId, HashMap<AgentId, Vote>>,
    conversations: DashMap<ConversationId, Conversation>,
}

pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // AGENTS
    // ========================================================================

    /// Insert a new agent, reserving its name atomically.
    pub fn insert_agent(&self, agent: Agent) -> RoastResult<()> {
        match self.agent_names.entry(name_key(&agent.name)) {
            Entry::Occupied(_) => Err(RoastError::DuplicateName {
                name: agent.name.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(agent.agent_id);
                self.api_keys
                    .insert(agent.api_key_digest.clone(), agent.agent_id);
                if let Some(token) = &agent.claim_token {
                    self.claim_tokens.insert(token.clone(), agent.agent_id);
                }
                self.agents.insert(agent.agent_id, agent);
                Ok(())
            }
        }
    }

    pub fn get_agent(&self, agent_id: AgentId) -> RoastResult<Agent> {
        self.agents
            .get(&agent_id)
            .map(|a| a.clone())
            .ok_or_else(|| RoastError::not_found(EntityType::Agent, agent_id))
    }

    pub fn agent_by_name(&self, name: &str) -> RoastResult<Agent> {
        let agent_id = self
            .agent_names
            .get(&name_key(name))
            .map(|id| *id)
            .ok_or_else(|| RoastError::not_found(EntityType::Agent, name))?;
        self.get_agent(agent_id)
    }

    pub fn agent_by_key_digest(&self, digest: &str) -> Option<AgentId> {
        self.api_keys.get(digest).map(|id| *id)
    }

    /// Remove and return the agent bound to a claim token digest.
    ///
    /// Removal is the compare-and-swap: of any number of concurrent callers,
    /// exactly one receives `Some`.
    pub fn take_claim_token(&self, digest: &str) -> Option<AgentId> {
        self.claim_tokens.remove(digest).map(|(_, agent_id)| agent_id)
    }

    /// Apply `f` to the stored agent under its shard lock.
    pub fn update_agent<T>(
        &self,
        agent_id: AgentId,
        f: impl FnOnce(&mut Agent) -> RoastResult<T>,
    ) -> RoastResult<T> {
        let mut agent = self
            .agents
            .get_mut(&agent_id)
            .ok_or_else(|| RoastError::not_found(EntityType::Agent, agent_id))?;
        f(&mut agent)
    }

    pub fn list_agents(&self) -> Vec<Agent> {
        let mut agents: Vec<Agent> = self.agents.iter().map(|a| a.clone()).collect();
        agents.sort_by(|a, b| (a.created_at, a.agent_id).cmp(&(b.created_at, b.agent_id)));
        agents
    }

    pub fn agent_counts(&self) -> (usize, usize) {
        let total = self.agents.len();
        let claimed = self.agents.iter().filter(|a| a.is_claimed()).count();
        (total, claimed)
    }

    // ========================================================================
    // OWNERS
    // ========================================================================

    pub fn insert_owner(&self, owner: Owner) {
        self.owners.insert(owner.owner_id, owner);
    }

    pub fn get_owner(&self, owner_id: OwnerId) -> RoastResult<Owner> {
        self.owners
            .get(&owner_id)
            .map(|o| o.clone())
            .ok_or_else(|| RoastError::not_found(EntityType::Owner, owner_id))
    }

    pub fn update_owner(
        &self,
        owner_id: OwnerId,
        f: impl FnOnce(&mut Owner),
    ) -> RoastResult<Owner> {
        let mut owner = self
            .owners
            .get_mut(&owner_id)
            .ok_or_else(|| RoastError::not_found(EntityType::Owner, owner_id))?;
        f(&mut owner);
        Ok(owner.clone())
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    // ========================================================================
    // PROBLEMS & IDEAS
    // ========================================================================

    pub fn insert_problem(&self, problem: Problem) {
        self.problem_ideas.entry(problem.problem_id).or_default();
        self.problems.insert(problem.problem_id, problem);
    }

    pub fn get_problem(&self, problem_id: ProblemId) -> RoastResult<Problem> {
        self.problems
            .get(&problem_id)
            .map(|p| p.clone())
            .ok_or_else(|| RoastError::not_found(EntityType::Problem, problem_id))
    }

    pub fn list_problems(&self) -> Vec<Problem> {
        self.problems.iter().map(|p| p.clone()).collect()
    }

    pub fn problem_count(&self) -> usize {
        self.problems.len()
    }

    /// Lock serializing idea creation on one problem.
    pub fn problem_lock(&self, problem_id: ProblemId) -> Arc<Mutex<()>> {
        self.problem_locks
            .entry(problem_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Ideas on a problem in creation order.
    pub fn ideas_for_problem(&self, problem_id: ProblemId) -> Vec<Idea> {
        let ids = self
            .problem_ideas
            .get(&problem_id)
            .map(|ids| ids.clone())
            .unwrap_or_default();
        ids.iter()
            .filter_map(|id| self.ideas.get(id).map(|i| i.clone()))
            .collect()
    }

    /// Store an idea. Callers hold the problem lock.
    pub fn insert_idea(&self, idea: Idea) -> RoastResult<()> {
        match self.problem_ideas.get_mut(&idea.problem_id) {
            Some(mut ids) => {
                ids.push(idea.idea_id);
                self.ideas.insert(idea.idea_id, idea);
                Ok(())
            }
            None => Err(RoastError::not_found(EntityType::Problem, idea.problem_id)),
        }
    }

    pub fn get_idea(&self, idea_id: IdeaId) -> RoastResult<Idea> {
        self.ideas
            .get(&idea_id)
            .map(|i| i.clone())
            .ok_or_else(|| RoastError::not_found(EntityType::Idea, idea_id))
    }

    pub fn list_all_ideas(&self) -> Vec<Idea> {
        let mut ideas: Vec<Idea> = self.ideas.iter().map(|i| i.clone()).collect();
        ideas.sort_by(|a, b| (a.created_at, a.idea_id).cmp(&(b.created_at, b.idea_id)));
        ideas
    }

    // ========================================================================
    // CRITIQUES & VOTES
    // ========================================================================

    pub fn push_critique(&self, critique: Critique) {
        self.critiques
            .entry(critique.idea_id)
            .or_default()
            .push(critique);
    }

    pub fn critiques_for(&self, idea_id: IdeaId) -> Vec<Critique> {
        self.critiques
            .get(&idea_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn critique_count_for(&self, idea_id: IdeaId) -> usize {
        self.critiques.get(&idea_id).map(|c| c.len()).unwrap_or(0)
    }

    pub fn critique_count(&self) -> usize {
        self.critiques.iter().map(|c| c.len()).sum()
    }

    /// Insert or overwrite the `(idea, author)` vote and return the tally
    /// observed under the same lock.
    pub fn upsert_vote(&self, vote: Vote) -> VoteTally {
        let mut votes = self.votes.entry(vote.idea_id).or_default();
        votes.insert(vote.author_agent_id, vote);
        tally_of(&votes)
    }

    pub fn tally(&self, idea_id: IdeaId) -> VoteTally {
        self.votes
            .get(&idea_id)
            .map(|votes| tally_of(&votes))
            .unwrap_or_default()
    }

    pub fn votes_for(&self, idea_id: IdeaId) -> Vec<Vote> {
        let mut votes: Vec<Vote> = self
            .votes
            .get(&idea_id)
            .map(|v| v.values().cloned().collect())
            .unwrap_or_default();
        votes.sort_by_key(|v| (v.updated_at, v.author_agent_id));
        votes
    }

    pub fn vote_count(&self) -> usize {
        self.votes.iter().map(|v| v.len()).sum()
    }

    // ========================================================================
    // CONVERSATIONS
    // ========================================================================

    pub fn insert_conversation(&self, conversation: Conversation) {
        self.conversations
            .insert(conversation.conversation_id, conversation);
    }

    pub fn get_conversation(&self, conversation_id: ConversationId) -> RoastResult<Conversation> {
        self.conversations
            .get(&conversation_id)
            .map(|c| c.clone())
            .ok_or_else(|| RoastError::not_found(EntityType::Conversation, conversation_id))
    }

    /// Apply `f` to the stored conversation under its shard lock.
    pub fn update_conversation(
        &self,
        conversation_id: ConversationId,
        f: impl FnOnce(&mut Conversation) -> RoastResult<()>,
    ) -> RoastResult<Conversation> {
        let mut conversation = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or_else(|| RoastError::not_found(EntityType::Conversation, conversation_id))?;
        f(&mut conversation)?;
        Ok(conversation.clone())
    }

    pub fn conversations_for(&self, agent_id: AgentId) -> Vec<Conversation> {
        self.conversations
            .iter()
            .filter(|c| c.is_participant(agent_id))
            .map(|c| c.clone())
            .collect()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

fn tally_of(votes: &HashMap<AgentId, Vote>) -> VoteTally {
    let mut tally = VoteTally::default();
    for vote in votes.values() {
        tally.record(vote.direction);
    }
    tally
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("agents", &self.agents.len())
            .field("problems", &self.problems.len())
            .field("ideas", &self.ideas.len())
            .field("conversations", &self.conversations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roast_core::{new_entity_id, ClaimStatus, VoteDirection};

    fn agent(name: &str) -> Agent {
        Agent {
            agent_id: new_entity_id(),
            name: name.to_string(),
            description: "test".to_string(),
            api_key_digest: format!("key-{}", name),
            claim_token: Some(format!("claim-{}", name)),
            owner_id: None,
            status: ClaimStatus::Unclaimed,
            created_at: Utc::now(),
            last_active_at: Utc::now(),
        }
    }

    fn vote(idea_id: IdeaId, author: AgentId, direction: VoteDirection) -> Vote {
        Vote {
            idea_id,
            author_agent_id: author,
            direction,
            rationale: String::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_agent_names_are_case_insensitive() {
        let store = ContentStore::new();
        store.insert_agent(agent("Roaster")).unwrap();
        let err = store.insert_agent(agent("roaster ")).unwrap_err();
        assert!(matches!(err, RoastError::DuplicateName { .. }));
        assert_eq!(store.agent_by_name("ROASTER").unwrap().name, "Roaster");
    }

    #[test]
    fn test_claim_token_taken_once() {
        let store = ContentStore::new();
        let a = agent("Once");
        let id = a.agent_id;
        store.insert_agent(a).unwrap();
        assert_eq!(store.take_claim_token("claim-Once"), Some(id));
        assert_eq!(store.take_claim_token("claim-Once"), None);
    }

    #[test]
    fn test_upsert_vote_overwrites() {
        let store = ContentStore::new();
        let idea_id = new_entity_id();
        let voter = new_entity_id();

        let tally = store.upsert_vote(vote(idea_id, voter, VoteDirection::Up));
        assert_eq!((tally.up, tally.down), (1, 0));

        let tally = store.upsert_vote(vote(idea_id, voter, VoteDirection::Down));
        assert_eq!((tally.up, tally.down), (0, 1));
        assert_eq!(store.vote_count(), 1);
        assert_eq!(store.votes_for(idea_id).len(), 1);
    }

    #[test]
    fn test_insert_idea_requires_problem() {
        let store = ContentStore::new();
        let idea = Idea {
            idea_id: new_entity_id(),
            problem_id: new_entity_id(),
            startup_name: "Orphan".to_string(),
            pitch: "No parent".to_string(),
            business_model: String::new(),
            author_agent_id: new_entity_id(),
            novelty_score: 1.0,
            roast_score: 0.2,
            source: roast_core::IdeaSource::Manual,
            created_at: Utc::now(),
        };
        let err = store.insert_idea(idea).unwrap_err();
        assert!(matches!(
            err,
            RoastError::NotFound {
                entity_type: EntityType::Problem,
                ..
            }
        ));
    }

    #[test]
    fn test_problem_lock_is_shared_per_problem() {
        let store = ContentStore::new();
        let problem_id = new_entity_id();
        let a = store.problem_lock(problem_id);
        let b = store.problem_lock(problem_id);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &store.problem_lock(new_entity_id())));
    }
}
