//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::rules::{Selection, Symptom};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new(SessionKey::new(1, 1))
}

fn selection_len(state: &ConvState) -> usize {
    state.selection().map_or(0, Selection::len)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_symptom() -> impl Strategy<Value = Symptom> {
    proptest::sample::select(Symptom::ALL)
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    proptest::collection::vec(arb_symptom(), 0..8).prop_map(|v| v.into_iter().collect())
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::End),
        arb_selection().prop_map(|selection| ConvState::Selecting { selection }),
        arb_selection()
            .prop_filter("confirming needs symptoms", |s| !s.is_empty())
            .prop_map(|selection| ConvState::Confirming { selection }),
    ]
}

/// Text a user might type: catalog ids, control words, and noise
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_symptom().prop_map(|s| s.as_str().to_string()),
        Just("Done".to_string()),
        Just("Yes".to_string()),
        Just("No".to_string()),
        Just("yes".to_string()),
        Just(" Done".to_string()),
        "[a-zA-Z_ ]{0,20}",
    ]
}

/// Text that is neither a catalog id nor a control word
fn arb_noise() -> impl Strategy<Value = String> {
    "[a-zA-Z_ ]{0,20}".prop_filter("noise only", |t| {
        t.parse::<Symptom>().is_err() && ![TERMINATOR, AFFIRM, DECLINE].contains(&t.as_str())
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        1 => Just(Event::Start),
        1 => Just(Event::Cancel),
        8 => arb_text().prop_map(|text| Event::Text { text }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Confirming always holds a non-empty selection
    #[test]
    fn prop_confirming_never_empty(events in proptest::collection::vec(arb_event(), 0..30)) {
        let ctx = test_context();
        let mut state = ConvState::End;
        for event in events {
            state = transition(&state, &ctx, event).new_state;
            if let ConvState::Confirming { selection } = &state {
                prop_assert!(!selection.is_empty());
            }
        }
    }

    // Cancel ends the session from anywhere and drops the selection
    #[test]
    fn prop_cancel_always_ends(state in arb_state()) {
        let result = transition(&state, &test_context(), Event::Cancel);
        prop_assert_eq!(result.new_state, ConvState::End);
        prop_assert_eq!(result.effects.len(), 1);
    }

    // Start always yields an empty selection
    #[test]
    fn prop_start_resets(state in arb_state()) {
        let result = transition(&state, &test_context(), Event::Start);
        prop_assert_eq!(result.new_state, ConvState::selecting());
    }

    // Noise never changes state or selection
    #[test]
    fn prop_noise_is_harmless(state in arb_state(), text in arb_noise()) {
        let result = transition(&state, &test_context(), Event::Text { text });
        prop_assert_eq!(result.new_state, state);
    }

    // While selecting, the selection grows by at most one per message
    #[test]
    fn prop_selection_grows_by_at_most_one(selection in arb_selection(), text in arb_text()) {
        let state = ConvState::Selecting { selection };
        let before = selection_len(&state);
        let result = transition(&state, &test_context(), Event::Text { text });
        if let ConvState::Selecting { .. } = &result.new_state {
            let after = selection_len(&result.new_state);
            prop_assert!(after == before || after == before + 1);
        }
    }

    // An active session answers every message exactly once
    #[test]
    fn prop_active_sessions_always_reply(state in arb_state(), event in arb_event()) {
        let active = state.is_active();
        let result = transition(&state, &test_context(), event.clone());
        let replies = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Reply { .. }))
            .count();
        if active || !matches!(event, Event::Text { .. }) {
            prop_assert_eq!(replies, 1);
        } else {
            prop_assert_eq!(replies, 0);
        }
    }

    // A diagnosis is recorded only on the way into End from Confirming
    #[test]
    fn prop_diagnosis_only_on_affirm(state in arb_state(), event in arb_event()) {
        let was_confirming = matches!(state, ConvState::Confirming { .. });
        let result = transition(&state, &test_context(), event.clone());
        let recorded = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RecordDiagnosis { .. }));
        let affirmed = matches!(&event, Event::Text { text } if text == AFFIRM);
        prop_assert_eq!(recorded, was_confirming && affirmed);
        if recorded {
            prop_assert_eq!(result.new_state, ConvState::End);
        }
    }

    // Transitions are deterministic
    #[test]
    fn prop_deterministic(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let a = transition(&state, &ctx, event.clone());
        let b = transition(&state, &ctx, event);
        prop_assert_eq!(a.new_state, b.new_state);
        prop_assert_eq!(a.effects, b.effects);
    }
}
