//! Property-Based Tests for the Scoring Engine
//!
//! **Property 1: Bounded scores.** Novelty, similarity and roast scores are
//! always finite and inside `[0, 1]`.
//!
//! **Property 2: Novelty baseline.** With no prior ideas novelty is 1.0; an
//! exact duplicate of any prior has novelty 0.0.
//!
//! **Property 3: Severity monotonicity.** For the same text, a more severe
//! rating never lowers the roast score.
//!
//! **Property 4: Determinism.** Equal inputs give equal scores.

use proptest::prelude::*;
use roast_core::Severity;
use roast_engine::{novelty, roast_score, similarity};
use roast_test_utils::assertions::assert_unit_score;
use roast_test_utils::generators::{arb_sentence, arb_severity, arb_text};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_scores_are_bounded(
        candidate in arb_text(),
        priors in prop::collection::vec(arb_text(), 0..6),
        severity in arb_severity(),
    ) {
        assert_unit_score(novelty(&candidate, &priors));
        assert_unit_score(roast_score(&candidate, severity));
        for prior in &priors {
            assert_unit_score(similarity(&candidate, prior));
        }
    }

    #[test]
    fn prop_similarity_is_symmetric(a in arb_sentence(), b in arb_sentence()) {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn prop_novelty_baseline(
        candidate in arb_sentence(),
        mut priors in prop::collection::vec(arb_sentence(), 0..6),
    ) {
        let none: [&str; 0] = [];
        prop_assert_eq!(novelty(&candidate, &none), 1.0);

        priors.push(candidate.clone());
        prop_assert_eq!(novelty(&candidate, &priors), 0.0);
    }

    #[test]
    fn prop_more_priors_never_raise_novelty(
        candidate in arb_sentence(),
        priors in prop::collection::vec(arb_sentence(), 1..8),
    ) {
        let fewer = novelty(&candidate, &priors[..priors.len() - 1]);
        let more = novelty(&candidate, &priors);
        prop_assert!(more <= fewer);
    }

    #[test]
    fn prop_roast_score_monotonic_in_severity(text in arb_text()) {
        let mild = roast_score(&text, Severity::Mild);
        let painful = roast_score(&text, Severity::Painful);
        let existential = roast_score(&text, Severity::Existential);
        prop_assert!(mild < painful);
        prop_assert!(painful < existential || existential == 1.0);
        prop_assert!(mild <= existential);
    }

    #[test]
    fn prop_scores_are_deterministic(text in arb_text(), severity in arb_severity()) {
        prop_assert_eq!(roast_score(&text, severity), roast_score(&text, severity));
        prop_assert_eq!(novelty(&text, &[text.as_str()]), novelty(&text, &[text.as_str()]));
    }
}
