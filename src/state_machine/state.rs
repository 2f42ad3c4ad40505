//! Conversation state types

use crate::rules::Selection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one conversation: a user inside a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Conversation state
///
/// The selection lives inside the state that uses it, so leaving a
/// state discards it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Collecting symptoms one at a time
    Selecting { selection: Selection },

    /// Waiting for the user to confirm the selection
    Confirming { selection: Selection },

    /// No session in progress. Also the state before the first start.
    #[default]
    End,
}

impl ConvState {
    pub fn selecting() -> Self {
        ConvState::Selecting {
            selection: Selection::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ConvState::End)
    }

    /// Selection held by the current state, if any
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            ConvState::Selecting { selection } | ConvState::Confirming { selection } => {
                Some(selection)
            }
            ConvState::End => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Selecting { .. } => "selecting",
            ConvState::Confirming { .. } => "confirming",
            ConvState::End => "end",
        }
    }
}

/// Default number of symptom buttons per keyboard row
pub const DEFAULT_KEYBOARD_COLUMNS: usize = 5;

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub key: SessionKey,
    /// Symptom buttons per row in the catalog keyboard
    pub keyboard_columns: usize,
}

impl ConvContext {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            keyboard_columns: DEFAULT_KEYBOARD_COLUMNS,
        }
    }

    #[must_use]
    pub fn with_keyboard_columns(mut self, columns: usize) -> Self {
        self.keyboard_columns = columns.max(1);
        self
    }
}
