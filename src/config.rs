//! Process configuration, read from the environment at startup

use crate::state_machine::state::DEFAULT_KEYBOARD_COLUMNS;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the Bot API
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout: Duration,
    /// Limit for every other call, `sendMessage` included
    pub request_timeout: Duration,
}

/// Webhook mode settings; absent means long polling
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Public HTTPS URL Telegram should POST updates to
    pub url: String,
    pub secret: Option<String>,
    pub listen: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub keyboard_columns: usize,
    pub webhook: Option<WebhookConfig>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let api_url = var("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let poll_timeout_secs = parse_var(
            "SYMPTOM_BOT_POLL_TIMEOUT_SECS",
            var("SYMPTOM_BOT_POLL_TIMEOUT_SECS"),
            DEFAULT_POLL_TIMEOUT_SECS,
        )?;
        let request_timeout_secs = parse_var(
            "SYMPTOM_BOT_REQUEST_TIMEOUT_SECS",
            var("SYMPTOM_BOT_REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let keyboard_columns: usize = parse_var(
            "SYMPTOM_BOT_KEYBOARD_COLUMNS",
            var("SYMPTOM_BOT_KEYBOARD_COLUMNS"),
            DEFAULT_KEYBOARD_COLUMNS,
        )?;
        if keyboard_columns == 0 {
            return Err(ConfigError::Invalid {
                name: "SYMPTOM_BOT_KEYBOARD_COLUMNS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let webhook = match var("SYMPTOM_BOT_WEBHOOK_URL") {
            Some(url) => {
                let port: u16 = parse_var("SYMPTOM_BOT_PORT", var("SYMPTOM_BOT_PORT"), DEFAULT_PORT)?;
                Some(WebhookConfig {
                    url,
                    secret: var("SYMPTOM_BOT_WEBHOOK_SECRET"),
                    listen: SocketAddr::from(([0, 0, 0, 0], port)),
                })
            }
            None => None,
        };

        Ok(Self {
            telegram: TelegramConfig {
                token,
                api_url,
                poll_timeout: Duration::from_secs(poll_timeout_secs),
                request_timeout: Duration::from_secs(request_timeout_secs),
            },
            keyboard_columns,
            webhook,
        })
    }
}

fn parse_var<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
