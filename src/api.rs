//! HTTP API for webhook mode
//!
//! Telegram POSTs updates to the webhook route; a health route reports
//! liveness and the number of live sessions.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::RuntimeManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`, if one was registered
    pub webhook_secret: Option<String>,
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(
        runtime: Arc<RuntimeManager>,
        webhook_secret: Option<String>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            runtime,
            webhook_secret,
            bot_username,
        }
    }
}
