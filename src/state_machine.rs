//! Conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime feeds events in and executes the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Keyboard};
pub use event::Event;
pub use state::{ConvContext, ConvState, SessionKey};
pub use transition::transition;
