//! Moonshot (Kimi) tip generation.
//!
//! Targets the Moonshot chat-completions API with a single-turn
//! prompt. No retries: a slow or unavailable tip must never hold up
//! the ranking, so failures degrade at the call site.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TipAnnotator;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const MOONSHOT_API_URL: &str = "https://api.moonshot.cn/v1/chat/completions";
const DEFAULT_MODEL: &str = "moonshot-v1-8k";

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Moonshot chat-completions client.
pub struct MoonshotClient {
    http: Client,
    api_key: String,
    model: String,
}

impl MoonshotClient {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("TIPSTER/0.1.0")
            .build()
            .context("Failed to build Moonshot HTTP client")?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn build_prompt(sport_name: &str, outcome: &str, best_price: f64, expected_roi: f64) -> String {
        format!(
            "Write a short, engaging 2-sentence betting tip for {sport_name} in markdown format. \
             The pick is **{outcome}** at odds {best_price:.2}, showing a value edge of {:.1}%. \
             Include current form, H2H, or an injury note if widely known, and be persuasive.",
            expected_roi * 100.0,
        )
    }
}

#[async_trait]
impl TipAnnotator for MoonshotClient {
    async fn annotate(
        &self,
        sport_name: &str,
        outcome: &str,
        best_price: f64,
        expected_roi: f64,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(sport_name, outcome, best_price, expected_roi),
            }],
        };

        debug!(sport = sport_name, outcome, "Requesting tip");

        let resp = self
            .http
            .post(MOONSHOT_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Moonshot request failed")?;

        let status = resp.status();
        if !status.is_success() {
            // Degraded-but-usable narrative; the caller shouldn't
            // treat a busy API as an error.
            return Ok(format!("Tip generation unavailable (status {status})."));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse Moonshot response")?;

        let text = body
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("Moonshot returned an empty completion");
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
