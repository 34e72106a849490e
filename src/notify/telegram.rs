/// Telegram Bot API client: message delivery and command polling
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BiasError, Result};

const BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    text: Option<String>,
}

/// Telegram notification sink
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String, timeout_sec: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to build HTTP client");

        TelegramNotifier {
            client,
            bot_token,
            chat_id,
        }
    }

    /// Deliver an HTML-formatted message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", BASE_URL, self.bot_token))
            .json(&request)
            .send()
            .await?;

        let api_response: ApiResponse = response.json().await?;
        if !api_response.ok {
            let reason = api_response
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(BiasError::DeliveryFailed(reason));
        }

        debug!("Delivered {} chars to chat {}", text.len(), self.chat_id);
        Ok(())
    }

    /// Long-poll for new updates; returns the next offset plus any command
    /// texts ("/..."-prefixed messages)
    pub async fn poll_commands(
        &self,
        offset: i64,
        poll_timeout_sec: u64,
    ) -> Result<(i64, Vec<String>)> {
        let response = self
            .client
            .get(format!("{}/bot{}/getUpdates", BASE_URL, self.bot_token))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", poll_timeout_sec.to_string()),
            ])
            // The request must outlive the server-side long poll
            .timeout(Duration::from_secs(poll_timeout_sec + 10))
            .send()
            .await?;

        let updates: UpdatesResponse = response.json().await?;
        if !updates.ok {
            return Err(BiasError::DeliveryFailed(
                "getUpdates rejected".to_string(),
            ));
        }

        let mut next_offset = offset;
        let mut commands = Vec::new();
        for update in updates.result {
            next_offset = next_offset.max(update.update_id + 1);
            if let Some(text) = update.message.and_then(|m| m.text) {
                if text.starts_with('/') {
                    commands.push(text);
                }
            }
        }

        Ok((next_offset, commands))
    }
}
