//! Effects produced by state transitions

use crate::rules::{Diagnosis, Symptom};
use serde::Serialize;

/// Reply keyboard to attach to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    /// Leave whatever keyboard the user currently has
    Unchanged,
    /// Show a grid of quick-reply buttons
    Grid {
        rows: Vec<Vec<String>>,
        one_time: bool,
    },
    /// Remove the quick-reply keyboard
    Remove,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send text back to the session's chat
    Reply { text: String, keyboard: Keyboard },

    /// A session finished with a classification
    RecordDiagnosis {
        diagnosis: Diagnosis,
        symptoms: Vec<Symptom>,
    },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard: Keyboard::Unchanged,
        }
    }

    pub fn reply_with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard,
        }
    }

    /// Text of a reply effect
    #[allow(dead_code)] // Used in tests
    pub fn reply_text(&self) -> Option<&str> {
        match self {
            Effect::Reply { text, .. } => Some(text),
            Effect::RecordDiagnosis { .. } => None,
        }
    }
}
