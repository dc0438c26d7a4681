//! Telegram transport.
//!
//! Long-polls the Bot API for commands and answers `/tips` with the
//! rendered pipeline output. Uses the raw HTTP API via reqwest.
//!
//! API docs: https://core.telegram.org/bots/api
//! Auth: bot token in the URL path.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::engine::TipsPipeline;
use crate::presenter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const API_BASE: &str = "https://api.telegram.org";

/// Long-poll wait, in seconds. The HTTP client timeout must exceed it.
const POLL_TIMEOUT_SECS: u64 = 50;

/// Pause after a failed poll before retrying.
const RETRY_DELAY_SECS: u64 = 5;

/// Sent immediately on `/tips`, before the pipeline runs.
const ACK_MESSAGE: &str = "🔍 Analyzing odds across markets... This may take up to a \
    minute to process all value picks and generate AI analysis. Please wait.";

// ---------------------------------------------------------------------------
// API response types (Bot API JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

// ---------------------------------------------------------------------------
// Bot
// ---------------------------------------------------------------------------

/// Long-polling Telegram bot serving the `/tips` command.
pub struct TelegramBot {
    http: Client,
    token: String,
}

impl TelegramBot {
    pub fn new(token: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .user_agent("TIPSTER/0.1.0")
            .build()
            .context("Failed to build Telegram HTTP client")?;

        Ok(Self { http, token })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    /// Poll for updates and serve commands until the task is aborted.
    pub async fn run(&self, pipeline: &TipsPipeline) -> Result<()> {
        info!("Bot polling started");
        let mut offset: i64 = 0;

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "Polling failed, retrying");
                    tokio::time::sleep(std::time::Duration::from_secs(RETRY_DELAY_SECS)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                let Some(message) = update.message else { continue };
                let Some(text) = message.text else { continue };

                if is_tips_command(&text) {
                    self.handle_tips(message.chat.id, pipeline).await;
                } else {
                    debug!(text = %text, "Ignoring non-command message");
                }
            }
        }
    }

    async fn handle_tips(&self, chat_id: i64, pipeline: &TipsPipeline) {
        info!(chat_id, "Handling /tips");

        if let Err(e) = self.send_markdown(chat_id, ACK_MESSAGE).await {
            warn!(chat_id, error = %e, "Failed to send acknowledgement");
        }

        let reports = pipeline.run().await;
        let reply = presenter::render(&reports);

        if let Err(e) = self.send_markdown(chat_id, &reply).await {
            warn!(chat_id, error = %e, "Failed to send tips reply");
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let url = format!(
            "{}?timeout={POLL_TIMEOUT_SECS}&offset={offset}&allowed_updates=[\"message\"]",
            self.method_url("getUpdates"),
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("getUpdates request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {status}: {body}");
        }

        let body: UpdatesResponse = resp
            .json()
            .await
            .context("Failed to parse getUpdates response")?;

        if !body.ok {
            anyhow::bail!("Telegram API returned ok=false");
        }

        Ok(body.result)
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .context("sendMessage request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {status}: {body}");
        }

        Ok(())
    }
}

/// Match `/tips` and the group-chat form `/tips@BotName`.
fn is_tips_command(text: &str) -> bool {
    let first = text.split_whitespace().next().unwrap_or("");
    first == "/tips" || first.starts_with("/tips@")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
