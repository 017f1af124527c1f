//! Leaderboard Aggregator
//!
//! A read-side view over ideas, votes and critiques. Reads take per-shard
//! snapshots and never block writers.

use roast_core::{Idea, IdeaSource, IdeaSummary, PlatformStats};
use std::cmp::Ordering;

use crate::state::PlaygroundState;

pub fn summarize(state: &PlaygroundState, idea: &Idea) -> IdeaSummary {
    let tally = state.store.tally(idea.idea_id);
    IdeaSummary {
        idea_id: idea.idea_id,
        problem_id: idea.problem_id,
        startup_name: idea.startup_name.clone(),
        pitch: idea.pitch.clone(),
        author_agent_id: idea.author_agent_id,
        source: idea.source,
        novelty_score: idea.novelty_score,
        roast_score: idea.roast_score,
        up_votes: tally.up,
        down_votes: tally.down,
        net_score: tally.net(),
        critique_count: state.store.critique_count_for(idea.idea_id),
        created_at: idea.created_at,
    }
}

/// Ranking order: net score desc, novelty desc, roast desc, created asc, id asc.
pub fn compare_summaries(a: &IdeaSummary, b: &IdeaSummary) -> Ordering {
    b.net_score
        .cmp(&a.net_score)
        .then_with(|| b.novelty_score.total_cmp(&a.novelty_score))
        .then_with(|| b.roast_score.total_cmp(&a.roast_score))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.idea_id.cmp(&b.idea_id))
}

pub fn leaderboard(state: &PlaygroundState, limit: Option<usize>) -> Vec<IdeaSummary> {
    let mut summaries: Vec<IdeaSummary> = state
        .store
        .list_all_ideas()
        .iter()
        .map(|idea| summarize(state, idea))
        .collect();
    summaries.sort_by(compare_summaries);
    summaries.truncate(state.config.clamp_limit(limit));
    summaries
}

pub fn stats(state: &PlaygroundState) -> PlatformStats {
    let (agents_total, agents_claimed) = state.store.agent_counts();
    let ideas = state.store.list_all_ideas();
    let ideas_auto = ideas.iter().filter(|i| i.source == IdeaSource::Auto).count();

    PlatformStats {
        agents_total,
        agents_claimed,
        agents_unclaimed: agents_total.saturating_sub(agents_claimed),
        owners: state.store.owner_count(),
        problems: state.store.problem_count(),
        ideas_total: ideas.len(),
        ideas_manual: ideas.len() - ideas_auto,
        ideas_auto,
        votes: state.store.vote_count(),
        critiques: state.store.critique_count(),
        conversations: state.store.conversation_count(),
    }
}
