//! Telegram Bot API transport
//!
//! A thin `reqwest` client for the handful of Bot API methods the bot
//! uses, plus the long-polling loop that feeds updates to the runtime.

mod error;
mod polling;
pub mod types;

pub use error::TelegramError;
pub use polling::run_polling;

use crate::config::TelegramConfig;
use crate::state_machine::Keyboard;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use types::{
    ApiResponse, GetUpdatesRequest, ReplyMarkup, SendMessageRequest, SetWebhookRequest, Update,
};

/// Extra slack on top of the long-poll timeout before reqwest gives up
const POLL_TIMEOUT_SLACK: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const ALLOWED_UPDATES: &[&str] = &["message"];

/// The bot's own account, from `getMe`
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout: Duration,
    request_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
            poll_timeout: config.poll_timeout,
            request_timeout: config.request_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_with_timeout(method, body, self.request_timeout).await
    }

    async fn call_with_timeout<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        // Telegram reports failures in the JSON envelope, whatever the status
        match response.json::<ApiResponse<T>>().await {
            Ok(envelope) => envelope.into_result(),
            Err(e) if !status.is_success() => Err(TelegramError::from_api(
                status.as_u16(),
                format!("HTTP {status}: {e}"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the bot's own identity; also validates the token
    pub async fn get_me(&self) -> Result<BotIdentity, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates starting at `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        // The server holds the request open for up to poll_timeout
        self.call_with_timeout("getUpdates", &request, self.poll_timeout + POLL_TIMEOUT_SLACK)
            .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: ReplyMarkup::from_keyboard(keyboard),
        };
        let _sent: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), TelegramError> {
        let request = SetWebhookRequest {
            url,
            secret_token: secret,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        let _: bool = self.call("setWebhook", &request).await?;
        Ok(())
    }

    /// Remove any webhook so that `getUpdates` is allowed
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self
            .call("deleteWebhook", &serde_json::json!({ "drop_pending_updates": false }))
            .await?;
        Ok(())
    }
}
