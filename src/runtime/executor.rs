//! Per-session runtime executor

use super::traits::MessageSink;
use crate::rules::Selection;
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event};
use tokio::sync::mpsc;

/// Drives one session: applies events to the state machine in arrival
/// order and carries out the resulting effects.
pub struct ConversationRuntime<S>
where
    S: MessageSink + 'static,
{
    context: ConvContext,
    state: ConvState,
    sink: S,
    event_rx: mpsc::Receiver<Event>,
}

impl<S> ConversationRuntime<S>
where
    S: MessageSink + 'static,
{
    pub fn new(
        context: ConvContext,
        state: ConvState,
        sink: S,
        event_rx: mpsc::Receiver<Event>,
    ) -> Self {
        Self {
            context,
            state,
            sink,
            event_rx,
        }
    }

    /// Process events until the session reaches `End`.
    ///
    /// Returns false instead if the channel closes first.
    pub async fn run_until_end(&mut self) -> bool {
        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
            if !self.state.is_active() {
                return true;
            }
        }
        tracing::debug!(
            session = %self.context.key,
            state = self.state.name(),
            "Session channel closed"
        );
        false
    }

    /// True if events are queued behind the one just processed
    pub fn has_pending(&self) -> bool {
        !self.event_rx.is_empty()
    }

    pub fn into_state(self) -> ConvState {
        self.state
    }

    pub async fn process_event(&mut self, event: Event) {
        let event_kind = event.kind();

        // Pure state transition
        let result = transition(&self.state, &self.context, event);

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state.name() != self.state.name() {
            tracing::debug!(
                chat_id = self.context.key.chat_id,
                user_id = self.context.key.user_id,
                event = event_kind,
                from = old_state.name(),
                to = self.state.name(),
                symptom_count = self.state.selection().map_or(0, Selection::len),
                "Session state changed"
            );
        }
        if old_state.is_active() && !self.state.is_active() {
            tracing::debug!(session = %self.context.key, event = event_kind, "Session ended");
        }

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
    }

    async fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::Reply { text, keyboard } => {
                // A failed send leaves the session where it is; the user can resend
                if let Err(e) = self
                    .sink
                    .send(self.context.key.chat_id, &text, &keyboard)
                    .await
                {
                    tracing::warn!(
                        chat_id = self.context.key.chat_id,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Failed to send reply"
                    );
                }
            }

            Effect::RecordDiagnosis {
                diagnosis,
                symptoms,
            } => {
                tracing::info!(
                    chat_id = self.context.key.chat_id,
                    user_id = self.context.key.user_id,
                    label = diagnosis.label,
                    matched = !diagnosis.is_unknown(),
                    symptom_count = symptoms.len(),
                    "Session classified"
                );
            }
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn state(&self) -> &ConvState {
        &self.state
    }
}
