//! Telegram Bot API client.
//!
//! A thin typed wrapper over the HTTPS Bot API using long polling.
//! Docs: <https://core.telegram.org/bots/api>

pub mod format;
pub mod membership;
pub mod types;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use types::{ApiResponse, Chat, ChatMember, InlineKeyboardMarkup, Message, Update};

/// Fixed wall-clock timeout for ordinary API calls.
const API_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Errors from Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP transport error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Payload could not be encoded
    #[error("payload encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The Bot API rejected the call
    #[error("Telegram API error: {0}")]
    Api(String),

    /// `ok: true` but no result payload
    #[error("Telegram API returned ok with no result")]
    EmptyResponse,
}

/// Client for the Telegram Bot API.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(API_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Send a text message (HTML parse mode) with an optional inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup {
            payload["reply_markup"] = serde_json::to_value(markup)?;
        }
        self.call("sendMessage", &payload, None).await
    }

    /// Replace the text of a previously sent message.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TelegramError> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        // The API returns either the edited Message or `true`.
        self.call::<serde_json::Value>("editMessageText", &payload, None)
            .await?;
        Ok(())
    }

    /// Acknowledge a callback query so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let payload = serde_json::json!({ "callback_query_id": callback_query_id });
        self.call::<bool>("answerCallbackQuery", &payload, None)
            .await?;
        Ok(())
    }

    /// Long-poll for new updates.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        // The request must outlive the server-side long-poll window.
        let timeout = std::time::Duration::from_secs(timeout_secs + 10);
        self.call("getUpdates", &payload, Some(timeout)).await
    }

    pub async fn get_chat_member(
        &self,
        chat_id: &str,
        user_id: i64,
    ) -> Result<ChatMember, TelegramError> {
        let payload = serde_json::json!({ "chat_id": chat_id, "user_id": user_id });
        self.call("getChatMember", &payload, None).await
    }

    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat, TelegramError> {
        let payload = serde_json::json!({ "chat_id": chat_id });
        self.call("getChat", &payload, None).await
    }

    /// Switch the bot to polling mode, discarding any backlog.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TelegramError> {
        let payload = serde_json::json!({ "drop_pending_updates": drop_pending_updates });
        self.call::<bool>("deleteWebhook", &payload, None).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
        timeout: Option<std::time::Duration>,
    ) -> Result<T, TelegramError> {
        let mut request = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response: ApiResponse<T> = request.send().await?.json().await?;
        if response.ok {
            response.result.ok_or(TelegramError::EmptyResponse)
        } else {
            Err(TelegramError::Api(
                response
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}
