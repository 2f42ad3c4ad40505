//! Runtime for executing conversations
//!
//! One task per session key, fed through an mpsc channel, so each session
//! handles its messages strictly in order while sessions run independently.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::state_machine::{ConvContext, ConvState, Event, SessionKey};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

const SESSION_CHANNEL_CAPACITY: usize = 32;

type SessionMap = HashMap<SessionKey, SessionHandle>;

/// An event addressed to one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub key: SessionKey,
    pub event: Event,
}

/// Handle to interact with a running session
struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    task: JoinHandle<ConvState>,
}

/// Manager for all session runtimes.
///
/// A session exists from the first start or cancel until it reaches `End`,
/// at which point its runtime removes itself from the registry.
pub struct RuntimeManager {
    sink: Arc<dyn MessageSink>,
    keyboard_columns: usize,
    sessions: Arc<RwLock<SessionMap>>,
}

impl RuntimeManager {
    pub fn new(sink: Arc<dyn MessageSink>, keyboard_columns: usize) -> Self {
        Self {
            sink,
            keyboard_columns,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Route an inbound event to its session, starting one if needed.
    ///
    /// Never waits on a session's queue, so a stalled session cannot hold
    /// up delivery to the others.
    pub async fn dispatch(&self, inbound: Inbound) {
        let Inbound { key, event } = inbound;

        // Sends happen under the lock so a runtime can't retire between
        // our lookup and the send
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&key) {
                enqueue(key, &handle.event_tx, event);
                return;
            }
        }

        // Without a session plain text has nothing to act on
        if let Event::Text { .. } = event {
            tracing::debug!(session = %key, "No active session, text ignored");
            return;
        }

        let mut sessions = self.sessions.write().await;
        // Another dispatch may have created it while we waited for the lock
        let handle = match sessions.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.spawn_session(key)),
        };
        enqueue(key, &handle.event_tx, event);
    }

    fn spawn_session(&self, key: SessionKey) -> SessionHandle {
        let context = ConvContext::new(key).with_keyboard_columns(self.keyboard_columns);
        let (event_tx, event_rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        let runtime =
            ConversationRuntime::new(context, ConvState::default(), self.sink.clone(), event_rx);
        let task = tokio::spawn(drive_session(runtime, key, self.sessions.clone()));

        tracing::debug!(session = %key, "Session runtime created");
        SessionHandle { event_tx, task }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Close every session and wait for queued events to drain.
    ///
    /// Returns the final state of each session.
    pub async fn shutdown(&self) -> HashMap<SessionKey, ConvState> {
        let sessions = std::mem::take(&mut *self.sessions.write().await);
        let mut finished = HashMap::with_capacity(sessions.len());

        for (key, handle) in sessions {
            let SessionHandle { event_tx, task } = handle;
            drop(event_tx);
            match task.await {
                Ok(state) => {
                    finished.insert(key, state);
                }
                Err(e) => tracing::error!(session = %key, error = %e, "Session task failed"),
            }
        }

        tracing::info!(sessions = finished.len(), "All sessions stopped");
        finished
    }
}

fn enqueue(key: SessionKey, event_tx: &mpsc::Sender<Event>, event: Event) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(
                session = %key,
                event = event.kind(),
                "Session queue full, event dropped"
            );
        }
        Err(TrySendError::Closed(event)) => {
            tracing::error!(
                session = %key,
                event = event.kind(),
                "Session runtime is gone, event dropped"
            );
        }
    }
}

/// Run a session until it ends, then retire it from the registry.
///
/// The queue is rechecked under the write lock: anything that arrived after
/// the session ended (a fresh start, say) keeps the same runtime going.
async fn drive_session<S>(
    mut runtime: ConversationRuntime<S>,
    key: SessionKey,
    sessions: Arc<RwLock<SessionMap>>,
) -> ConvState
where
    S: MessageSink + 'static,
{
    tracing::debug!(session = %key, "Starting session runtime");

    while runtime.run_until_end().await {
        let mut sessions = sessions.write().await;
        if runtime.has_pending() {
            continue;
        }
        sessions.remove(&key);
        tracing::debug!(session = %key, "Session ended, runtime released");
        break;
    }

    runtime.into_state()
}
