//! Trait abstractions for runtime I/O
//!
//! The sink trait lets the executor run against a recorder in tests.

use crate::state_machine::Keyboard;
use crate::telegram::{TelegramClient, TelegramError};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the chat transport
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send text to a chat, optionally changing its reply keyboard
    async fn send(&self, chat_id: i64, text: &str, keyboard: &Keyboard)
        -> Result<(), TelegramError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        (**self).send(chat_id, text, keyboard).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl MessageSink for TelegramClient {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        self.send_message(chat_id, text, keyboard).await
    }
}
