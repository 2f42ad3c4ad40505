//! API request and response types

use serde::Serialize;

/// Acknowledgement returned to Telegram for every accepted update
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
