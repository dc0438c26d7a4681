//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys, bot token) are referenced by env-var name in the
//! config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub odds: OddsConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub name: String,
    pub telegram_token_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsConfig {
    pub api_key_env: String,
    #[serde(default = "default_regions")]
    pub regions: String,
    /// Sports scanned on every `/tips`, in reply order.
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub api_key_env: String,
    pub model: String,
}

fn default_regions() -> String {
    "eu,us".to_string()
}

fn default_sports() -> Vec<String> {
    [
        "soccer_epl",
        "soccer_spain_la_liga",
        "soccer_germany_bundesliga",
        "soccer_italy_serie_a",
        "tennis_atp",
        "tennis_wta",
        "basketball_nba",
        "americanfootball_nfl",
        "handball_euro_championship",
        "badminton",
        "darts",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
