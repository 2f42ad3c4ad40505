//! Telegram Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled; everything else in
//! Telegram's payloads is ignored by serde.

use super::TelegramError;
use crate::runtime::Inbound;
use crate::state_machine::{Event, Keyboard, SessionKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Envelope wrapping every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<u16>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the envelope into the result or a classified error
    pub fn into_result(self) -> Result<T, TelegramError> {
        if self.ok {
            return self
                .result
                .ok_or_else(|| TelegramError::unknown("Response marked ok but has no result"));
        }

        let description = self
            .description
            .unwrap_or_else(|| "Unknown Telegram error".to_string());
        let mut err = TelegramError::from_api(self.error_code.unwrap_or(0), description);
        if let Some(secs) = self.parameters.and_then(|p| p.retry_after) {
            err = err.with_retry_after(Duration::from_secs(secs));
        }
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

impl Update {
    /// Convert into a session event.
    ///
    /// Returns None for updates the bot does not react to: non-message
    /// updates, messages without text or sender, messages from bots, and
    /// commands other than /start and /cancel.
    pub fn into_inbound(self, bot_username: Option<&str>) -> Option<Inbound> {
        let message = self.message?;
        let from = message.from?;
        if from.is_bot {
            return None;
        }
        let text = message.text?;
        let event = parse_event(&text, bot_username)?;
        Some(Inbound {
            key: SessionKey::new(message.chat.id, from.id),
            event,
        })
    }
}

fn parse_event(text: &str, bot_username: Option<&str>) -> Option<Event> {
    let Some(command) = text.trim_start().strip_prefix('/') else {
        return Some(Event::text(text));
    };

    let word = command.split_whitespace().next().unwrap_or_default();
    let (name, target) = match word.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (word, None),
    };

    // In group chats a command may be addressed to a different bot
    if let (Some(target), Some(me)) = (target, bot_username) {
        if !target.eq_ignore_ascii_case(me) {
            return None;
        }
    }

    match name {
        "start" => Some(Event::Start),
        "cancel" => Some(Event::Cancel),
        _ => None,
    }
}

/// Reply markup attached to `sendMessage`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        one_time_keyboard: bool,
        resize_keyboard: bool,
    },
    Remove {
        remove_keyboard: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

impl ReplyMarkup {
    pub fn from_keyboard(keyboard: &Keyboard) -> Option<Self> {
        match keyboard {
            Keyboard::Unchanged => None,
            Keyboard::Grid { rows, one_time } => Some(ReplyMarkup::Keyboard {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|text| KeyboardButton { text: text.clone() })
                            .collect()
                    })
                    .collect(),
                one_time_keyboard: *one_time,
                resize_keyboard: true,
            }),
            Keyboard::Remove => Some(ReplyMarkup::Remove {
                remove_keyboard: true,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SetWebhookRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<&'a str>,
    pub allowed_updates: Vec<&'static str>,
}
