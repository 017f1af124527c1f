//! Scoring Engine
//!
//! Deterministic novelty and roast scores. The text capability only supplies
//! the roast wording; every number is computed lexically from the submitted
//! text so equal inputs always score equally.

use crate::moderation::{flag_reason, sanitize};
use roast_core::Severity;
use roast_llm::{CapabilityRouter, RoastRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Neutral restatement used when the submitted text breaks the content rules.
pub const FLAGGED_ROAST: &str = "Someone reported a problem, but the description got flagged by our \
     taste police. Let's just say: humans are struggling, and we're here to help. Allegedly.";

const SUPERLATIVES: &[&str] = &[
    "always", "best", "biggest", "constantly", "every", "everyone", "everything", "forever",
    "hardest", "least", "literally", "most", "totally", "ultimate", "worst",
];

const NEGATIONS: &[&str] = &[
    "can't", "cannot", "don't", "doesn't", "isn't", "never", "no", "nobody", "none", "not",
    "nothing", "without", "won't",
];

const ROAST_SIGNALS: &[&str] = &[
    "awkward", "commiserate", "cringe", "embarrass", "guilt", "meme", "nagging",
    "passive-aggressive", "shame", "suffer",
];

const SUPERLATIVE_WEIGHT: f64 = 0.05;
const SUPERLATIVE_CAP: f64 = 0.15;
const NEGATION_WEIGHT: f64 = 0.04;
const NEGATION_CAP: f64 = 0.12;
const SIGNAL_WEIGHT: f64 = 0.03;
const SIGNAL_CAP: f64 = 0.09;

// ============================================================================
// TOKENS & SIMILARITY
// ============================================================================

/// Lowercased word set. Apostrophes stay inside words; typographic ones
/// count as `'`.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .replace(['\u{2018}', '\u{2019}'], "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Jaccard similarity of the two token sets, in `[0, 1]`.
///
/// Two empty texts are identical (1.0); one empty text shares nothing (0.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

pub fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

// ============================================================================
// NOVELTY
// ============================================================================

/// `1 - max similarity` against every prior text; 1.0 with no priors.
pub fn novelty<S: AsRef<str>>(candidate: &str, priors: &[S]) -> f64 {
    let candidate_tokens = tokenize(candidate);
    let max_similarity = priors
        .iter()
        .map(|prior| jaccard(&candidate_tokens, &tokenize(prior.as_ref())))
        .fold(0.0_f64, f64::max);
    (1.0 - max_similarity).clamp(0.0, 1.0)
}

// ============================================================================
// ROAST
// ============================================================================

fn severity_base(severity: Severity) -> f64 {
    match severity {
        Severity::Mild => 0.2,
        Severity::Painful => 0.45,
        Severity::Existential => 0.7,
    }
}

/// Lexical roast intensity in `[0, 1]`.
///
/// Severity sets the base; superlatives, negations, exclamations and roast
/// words add capped bonuses that do not depend on severity, so raising the
/// severity of the same text never lowers the score.
pub fn roast_score(text: &str, severity: Severity) -> f64 {
    let tokens = tokenize(text);
    let lower = text.to_lowercase();

    let superlatives = SUPERLATIVES.iter().filter(|w| tokens.contains(**w)).count()
        + text.matches('!').count().min(2);
    let negations = NEGATIONS.iter().filter(|w| tokens.contains(**w)).count();
    let signals = ROAST_SIGNALS.iter().filter(|s| lower.contains(**s)).count();

    let bonus = (superlatives as f64 * SUPERLATIVE_WEIGHT).min(SUPERLATIVE_CAP)
        + (negations as f64 * NEGATION_WEIGHT).min(NEGATION_CAP)
        + (signals as f64 * SIGNAL_WEIGHT).min(SIGNAL_CAP);

    (severity_base(severity) + bonus).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastOutcome {
    pub roast_text: String,
    pub roast_score: f64,
}

/// Restate `text` as a roast and score it.
///
/// The wording comes from the router (hosted capability or heuristic); the
/// score is always [`roast_score`] of the input.
pub async fn roast(
    router: &CapabilityRouter,
    text: &str,
    severity: Severity,
    tags: &[String],
    max_len: usize,
) -> RoastOutcome {
    let roast_score = roast_score(text, severity);

    if let Some(reason) = flag_reason(text) {
        tracing::debug!(reason, "Roast input flagged, using neutral roast");
        return RoastOutcome {
            roast_text: FLAGGED_ROAST.to_string(),
            roast_score,
        };
    }

    let request = RoastRequest {
        text: text.to_string(),
        severity,
        tags: tags.to_vec(),
    };
    let mut roast_text = sanitize(&router.roast_text(&request).await, max_len);

    // Capability output is held to the same rules as user input.
    if roast_text.is_empty() || flag_reason(&roast_text).is_some() {
        roast_text = sanitize(&roast_llm::HeuristicCapability::new().roast(&request), max_len);
    }

    tracing::debug!(%severity, roast_score, "Roast scored");
    RoastOutcome {
        roast_text,
        roast_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("I can't find my KEYS, again!");
        assert!(tokens.contains("can't"));
        assert!(tokens.contains("keys"));
        assert!(tokens.contains("again"));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_typographic_apostrophes_match_straight_ones() {
        assert_eq!(tokenize("I don\u{2019}t"), tokenize("I don't"));
        assert_eq!(
            roast_score("I don\u{2019}t ever sleep", Severity::Mild),
            roast_score("I don't ever sleep", Severity::Mild)
        );
        assert!(roast_score("I don\u{2019}t", Severity::Mild) > roast_score("I do", Severity::Mild));
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "keys"), 0.0);
        assert_eq!(similarity("lost keys", "keys lost"), 1.0);
        assert_eq!(similarity("lost keys", "found wallet"), 0.0);
        let partial = similarity("lost my keys", "lost my wallet");
        assert!((partial - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_novelty_without_priors_is_one() {
        let priors: Vec<String> = vec![];
        assert_eq!(novelty("anything at all", &priors), 1.0);
    }

    #[test]
    fn test_novelty_uses_closest_prior() {
        let priors = ["an app that waters plants", "a drone for socks"];
        assert_eq!(novelty("an app that waters plants", &priors), 0.0);
        let score = novelty("an app that waters plants daily", &priors);
        assert!(score > 0.0 && score < 0.5);
    }

    #[test]
    fn test_roast_score_orders_by_severity() {
        let text = "I never remember to water my plants";
        let mild = roast_score(text, Severity::Mild);
        let painful = roast_score(text, Severity::Painful);
        let existential = roast_score(text, Severity::Existential);
        assert!(mild < painful);
        assert!(painful < existential);
    }

    #[test]
    fn test_roast_score_rewards_drama() {
        let plain = roast_score("my plants are dry", Severity::Mild);
        let dramatic = roast_score(
            "literally the worst! my plants never survive and the shame is awkward!",
            Severity::Mild,
        );
        assert!(dramatic > plain);
        assert!(dramatic <= 1.0);
        assert_eq!(roast_score("", Severity::Existential), 0.7);
    }

    #[tokio::test]
    async fn test_roast_flagged_text_is_neutral() {
        let router = CapabilityRouter::heuristic_only(Duration::from_secs(1));
        let outcome = roast(&router, "my neighbour wants to kill my vibe", Severity::Mild, &[], 2000).await;
        assert_eq!(outcome.roast_text, FLAGGED_ROAST);
        assert!(outcome.roast_score >= 0.2);
    }

    #[tokio::test]
    async fn test_roast_uses_router_text() {
        let router = CapabilityRouter::heuristic_only(Duration::from_secs(1));
        let outcome = roast(&router, "Forgets every birthday", Severity::Painful, &[], 2000).await;
        assert!(outcome.roast_text.contains("forgets every birthday"));
        assert_eq!(outcome.roast_score, roast_score("Forgets every birthday", Severity::Painful));
    }
}
