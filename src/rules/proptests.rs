//! Property-based tests for rule matching

use super::*;
use proptest::prelude::*;

fn arb_symptom() -> impl Strategy<Value = Symptom> {
    proptest::sample::select(Symptom::ALL)
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    proptest::collection::vec(arb_symptom(), 0..12).prop_map(|v| v.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // The winning rule is satisfied and no earlier rule is
    #[test]
    fn prop_first_match_wins(selection in arb_selection()) {
        let diagnosis = classify(&selection);
        match RULES.iter().position(|r| r.diagnosis == diagnosis) {
            Some(idx) => {
                prop_assert!(RULES[idx].matches(&selection));
                for earlier in &RULES[..idx] {
                    prop_assert!(!earlier.matches(&selection));
                }
            }
            None => {
                prop_assert_eq!(diagnosis, UNKNOWN);
                prop_assert!(RULES.iter().all(|r| !r.matches(&selection)));
            }
        }
    }

    // Matching ignores pick order
    #[test]
    fn prop_order_insensitive(picks in proptest::collection::vec(arb_symptom(), 0..12)) {
        let forward: Selection = picks.iter().copied().collect();
        let backward: Selection = picks.iter().rev().copied().collect();
        prop_assert_eq!(classify(&forward), classify(&backward));
    }

    // Re-adding anything already selected never changes the outcome
    #[test]
    fn prop_duplicates_collapse(picks in proptest::collection::vec(arb_symptom(), 1..12)) {
        let once: Selection = picks.iter().copied().collect();
        let twice: Selection = picks.iter().chain(picks.iter()).copied().collect();
        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(classify(&once), classify(&twice));
    }

    // Any superset of the flu symptoms is flu, since flu is the top rule
    #[test]
    fn prop_flu_superset(extra in arb_selection()) {
        let mut selection = extra;
        for symptom in RULES[0].requires {
            selection.insert(*symptom);
        }
        prop_assert_eq!(classify(&selection).label, "flu");
    }

    // Fewer than three symptoms can never satisfy a rule
    #[test]
    fn prop_small_selections_are_unknown(picks in proptest::collection::vec(arb_symptom(), 0..3)) {
        let selection: Selection = picks.into_iter().collect();
        prop_assert!(classify(&selection).is_unknown());
    }
}
