//! Mock implementations for testing
//!
//! These mocks enable runtime testing without a live Telegram connection.

use super::traits::MessageSink;
use super::RuntimeManager;
use crate::state_machine::Keyboard;
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A message captured by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Keyboard,
}

/// Sink that records every message instead of sending it
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with a network error
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent to one chat, in order
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TelegramError::network("sink offline"));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }
}

/// Sink whose sends never complete, like a Telegram call that hangs
pub struct StalledSink;

#[async_trait]
impl MessageSink for StalledSink {
    async fn send(
        &self,
        _chat_id: i64,
        _text: &str,
        _keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        std::future::pending().await
    }
}

/// Wait until every session has ended and left the registry
pub async fn wait_for_idle(manager: &RuntimeManager) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while manager.session_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("sessions still running");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ConversationRuntime, Inbound};
    use crate::rules::Symptom;
    use crate::state_machine::{ConvContext, ConvState, Event, SessionKey};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn runtime_for(
        key: SessionKey,
        sink: Arc<RecordingSink>,
    ) -> (ConversationRuntime<Arc<RecordingSink>>, mpsc::Sender<Event>) {
        let (tx, rx) = mpsc::channel(8);
        let runtime = ConversationRuntime::new(ConvContext::new(key), ConvState::End, sink, rx);
        (runtime, tx)
    }

    #[tokio::test]
    async fn test_runtime_replies_through_sink() {
        let sink = Arc::new(RecordingSink::new());
        let (mut runtime, _tx) = runtime_for(SessionKey::new(10, 1), sink.clone());

        runtime.process_event(Event::Start).await;
        runtime.process_event(Event::text("fever")).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.chat_id == 10));
        assert!(matches!(sent[0].keyboard, Keyboard::Grid { one_time: false, .. }));
        assert_eq!(sent[1].keyboard, Keyboard::Unchanged);
        assert_eq!(
            runtime.state().selection().unwrap().to_vec(),
            vec![Symptom::Fever]
        );
    }

    #[tokio::test]
    async fn test_send_failure_does_not_stall_session() {
        let sink = Arc::new(RecordingSink::new());
        let (mut runtime, _tx) = runtime_for(SessionKey::new(10, 1), sink.clone());

        sink.fail_sends(true);
        runtime.process_event(Event::Start).await;
        assert_eq!(runtime.state(), &ConvState::selecting());
        assert!(sink.sent().is_empty());

        sink.fail_sends(false);
        runtime.process_event(Event::text("cough")).await;
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_channel_then_returns_state() {
        let sink = Arc::new(RecordingSink::new());
        let (mut runtime, tx) = runtime_for(SessionKey::new(3, 3), sink.clone());

        tx.send(Event::Start).await.unwrap();
        tx.send(Event::text("rash")).await.unwrap();
        drop(tx);

        assert!(!runtime.run_until_end().await);
        let state = runtime.into_state();
        assert_eq!(state.selection().unwrap().len(), 1);
        assert_eq!(sink.texts_for(3).len(), 2);
    }

    #[tokio::test]
    async fn test_run_stops_at_end_with_later_events_queued() {
        let sink = Arc::new(RecordingSink::new());
        let (mut runtime, tx) = runtime_for(SessionKey::new(4, 4), sink.clone());

        tx.send(Event::Start).await.unwrap();
        tx.send(Event::Cancel).await.unwrap();
        tx.send(Event::Start).await.unwrap();

        assert!(runtime.run_until_end().await);
        assert_eq!(runtime.state(), &ConvState::End);
        assert!(runtime.has_pending());

        drop(tx);
        assert!(!runtime.run_until_end().await);
        assert_eq!(runtime.into_state(), ConvState::selecting());
    }

    #[tokio::test]
    async fn test_manager_tuberculosis_session() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);
        let key = SessionKey::new(100, 200);

        for event in [
            Event::Start,
            Event::text("persistent_cough"),
            Event::text("night_sweats"),
            Event::text("weight_loss"),
            Event::text("fever"),
            Event::text("Done"),
            Event::text("Yes"),
        ] {
            manager.dispatch(Inbound { key, event }).await;
        }

        // The finished session leaves the registry on its own
        wait_for_idle(&manager).await;
        assert!(manager.shutdown().await.is_empty());

        let texts = sink.texts_for(100);
        assert_eq!(texts.len(), 7);
        assert!(texts[6].contains("tuberculosis"));
        assert_eq!(sink.sent().last().unwrap().keyboard, Keyboard::Remove);
    }

    #[tokio::test]
    async fn test_manager_isolates_sessions() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);
        let alice = SessionKey::new(1, 1);
        // Same chat, different user
        let bob = SessionKey::new(1, 2);

        manager
            .dispatch(Inbound {
                key: alice,
                event: Event::Start,
            })
            .await;
        manager
            .dispatch(Inbound {
                key: alice,
                event: Event::text("fever"),
            })
            .await;
        manager
            .dispatch(Inbound {
                key: bob,
                event: Event::Start,
            })
            .await;
        manager
            .dispatch(Inbound {
                key: bob,
                event: Event::text("Done"),
            })
            .await;

        assert_eq!(manager.session_count().await, 2);
        let finished = manager.shutdown().await;

        assert_eq!(finished[&alice].selection().unwrap().len(), 1);
        assert_eq!(finished[&bob], ConvState::selecting());
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_manager_cancel_discards_selection() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);
        let key = SessionKey::new(7, 7);

        for event in [Event::Start, Event::text("fever"), Event::Cancel] {
            manager.dispatch(Inbound { key, event }).await;
        }

        wait_for_idle(&manager).await;
        assert_eq!(manager.session_count().await, 0);
        assert_eq!(
            sink.texts_for(7).last().unwrap(),
            "Operation cancelled. Type /start to begin again."
        );
    }

    #[tokio::test]
    async fn test_text_before_start_creates_no_session() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);

        for user in 0..500 {
            manager
                .dispatch(Inbound {
                    key: SessionKey::new(8, user),
                    event: Event::text("hello"),
                })
                .await;
        }
        assert_eq!(manager.session_count().await, 0);

        manager.shutdown().await;
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_without_session_replies_and_leaves_nothing_behind() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);

        manager
            .dispatch(Inbound {
                key: SessionKey::new(9, 9),
                event: Event::Cancel,
            })
            .await;

        wait_for_idle(&manager).await;
        assert_eq!(
            sink.texts_for(9),
            vec!["Operation cancelled. Type /start to begin again.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_start_right_after_cancel_is_not_lost() {
        let sink = Arc::new(RecordingSink::new());
        let manager = RuntimeManager::new(sink.clone(), 5);
        let key = SessionKey::new(11, 11);

        for event in [Event::Start, Event::text("fever"), Event::Cancel, Event::Start] {
            manager.dispatch(Inbound { key, event }).await;
        }

        let finished = manager.shutdown().await;
        assert_eq!(finished[&key], ConvState::selecting());
        assert_eq!(sink.texts_for(11).len(), 4);
    }

    #[tokio::test]
    async fn test_stalled_session_does_not_block_dispatch() {
        let manager = RuntimeManager::new(Arc::new(StalledSink), 5);
        let stuck = SessionKey::new(12, 1);

        let flood = async {
            manager
                .dispatch(Inbound {
                    key: stuck,
                    event: Event::Start,
                })
                .await;
            // Far more than the session queue holds
            for _ in 0..200 {
                manager
                    .dispatch(Inbound {
                        key: stuck,
                        event: Event::text("fever"),
                    })
                    .await;
            }
            manager
                .dispatch(Inbound {
                    key: SessionKey::new(13, 1),
                    event: Event::Start,
                })
                .await;
        };
        tokio::time::timeout(Duration::from_secs(2), flood)
            .await
            .expect("dispatch blocked on a full session queue");
        assert_eq!(manager.session_count().await, 2);
    }
}
