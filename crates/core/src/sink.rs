//! Message Delivery
//!
//! This module defines the contract for delivering lesson text to the
//! learner, and an implementation backed by the Telegram Bot API.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Defines the contract for any channel that can deliver a lesson.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Delivers `text` to the configured chat target.
    ///
    /// Returns `Ok(())` only when the endpoint has confirmed delivery;
    /// the caller commits status transitions on that confirmation.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Request payload for the Telegram `sendMessage` method.
#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Response envelope every Telegram Bot API method returns.
#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// A `MessageSink` that posts to a Telegram chat via the Bot API.
pub struct TelegramSink {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramSink {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            chat_id,
        }
    }

    fn send_message_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessagePayload {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .http
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = response.status();
        let envelope: TelegramResponse = response
            .json()
            .await
            .context("Telegram returned an unreadable response body")?;

        if !status.is_success() || !envelope.ok {
            bail!(
                "Telegram rejected the message ({}): {}",
                status,
                envelope.description.unwrap_or_else(|| "no description".to_string())
            );
        }

        Ok(())
    }
}
