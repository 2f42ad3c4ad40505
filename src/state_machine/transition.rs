//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects, with no I/O.

use super::{ConvContext, ConvState, Effect, Event, Keyboard};
use crate::rules::{classify, Symptom};

/// Choice that ends symptom selection
pub const TERMINATOR: &str = "Done";
pub const AFFIRM: &str = "Yes";
pub const DECLINE: &str = "No";

const GREETING: &str = "Hi! I'm your Healthcare Chatbot. Please select your symptoms one by one. When finished, press 'Done'.";
const RESTART: &str = "Let's start over. Please select your symptoms again.";
const INVALID_SYMPTOM: &str = "Invalid symptom. Please select from the list or press 'Done'.";
const EMPTY_SELECTION: &str =
    "You haven't selected any symptoms. Please select at least one or type /cancel.";
const YES_OR_NO: &str = "Please reply with 'Yes' or 'No'.";
const CANCELLED: &str = "Operation cancelled. Type /start to begin again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Answer to the confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Affirm,
    Decline,
}

fn parse_answer(text: &str) -> Option<Answer> {
    match text {
        AFFIRM => Some(Answer::Affirm),
        DECLINE => Some(Answer::Decline),
        _ => None,
    }
}

fn is_terminator(text: &str) -> bool {
    text == TERMINATOR
}

/// Pure transition function
pub fn transition(state: &ConvState, context: &ConvContext, event: Event) -> TransitionResult {
    match (state, event) {
        // Start and cancel work from every state
        (_, Event::Start) => TransitionResult::new(ConvState::selecting())
            .with_effect(Effect::reply_with_keyboard(GREETING, catalog_keyboard(context))),

        (_, Event::Cancel) => TransitionResult::new(ConvState::End)
            .with_effect(Effect::reply_with_keyboard(CANCELLED, Keyboard::Remove)),

        // ============================================================
        // Symptom selection
        // ============================================================
        (ConvState::Selecting { selection }, Event::Text { text }) if is_terminator(&text) => {
            if selection.is_empty() {
                TransitionResult::new(state.clone()).with_effect(Effect::reply(EMPTY_SELECTION))
            } else {
                TransitionResult::new(ConvState::Confirming {
                    selection: selection.clone(),
                })
                .with_effect(Effect::reply_with_keyboard(
                    format!("You selected: {selection}. Is this correct? (Yes/No)"),
                    confirm_keyboard(),
                ))
            }
        }

        (ConvState::Selecting { selection }, Event::Text { text }) => {
            match text.parse::<Symptom>() {
                Ok(symptom) => {
                    let mut selection = selection.clone();
                    let reply = if selection.insert(symptom) {
                        format!("Added '{symptom}'. Select another symptom or press 'Done'.")
                    } else {
                        format!("'{symptom}' is already selected. Choose another or press 'Done'.")
                    };
                    TransitionResult::new(ConvState::Selecting { selection })
                        .with_effect(Effect::reply(reply))
                }
                Err(_) => TransitionResult::new(state.clone())
                    .with_effect(Effect::reply(INVALID_SYMPTOM)),
            }
        }

        // ============================================================
        // Confirmation
        // ============================================================
        (ConvState::Confirming { selection }, Event::Text { text }) => match parse_answer(&text) {
            Some(Answer::Affirm) => {
                let diagnosis = classify(selection);
                let reply = format!(
                    "Based on {selection}, the closest match is: {}.\n{}",
                    diagnosis.label, diagnosis.advisory
                );
                TransitionResult::new(ConvState::End)
                    .with_effect(Effect::RecordDiagnosis {
                        diagnosis,
                        symptoms: selection.to_vec(),
                    })
                    .with_effect(Effect::reply_with_keyboard(reply, Keyboard::Remove))
            }
            Some(Answer::Decline) => TransitionResult::new(ConvState::selecting())
                .with_effect(Effect::reply_with_keyboard(RESTART, catalog_keyboard(context))),
            None => TransitionResult::new(state.clone()).with_effect(Effect::reply(YES_OR_NO)),
        },

        // Nothing in progress: ordinary text is ignored until the next start
        (ConvState::End, Event::Text { .. }) => TransitionResult::new(ConvState::End),
    }
}

/// Full catalog, `keyboard_columns` per row, with the terminator on its own row
pub fn catalog_keyboard(context: &ConvContext) -> Keyboard {
    let mut rows: Vec<Vec<String>> = Symptom::ALL
        .chunks(context.keyboard_columns.max(1))
        .map(|row| row.iter().map(|s| s.as_str().to_string()).collect())
        .collect();
    rows.push(vec![TERMINATOR.to_string()]);
    Keyboard::Grid {
        rows,
        one_time: false,
    }
}

fn confirm_keyboard() -> Keyboard {
    Keyboard::Grid {
        rows: vec![vec![AFFIRM.to_string(), DECLINE.to_string()]],
        one_time: true,
    }
}
