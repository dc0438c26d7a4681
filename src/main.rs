//! TIPSTER — Telegram value-betting tips bot
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the odds source, annotator, and pipeline together, and runs
//! the Telegram long-poll loop with graceful shutdown.

use anyhow::Result;
use tracing::{info, warn};

use tipster::bot::TelegramBot;
use tipster::config;
use tipster::engine::TipsPipeline;
use tipster::llm::moonshot::MoonshotClient;
use tipster::odds::cache::CachedQuoteSource;
use tipster::odds::client::OddsApiClient;

const BANNER: &str = r#"
 _____ ___ ____  ____ _____ _____ ____
|_   _|_ _|  _ \/ ___|_   _| ____|  _ \
  | |  | || |_) \___ \ | | |  _| | |_) |
  | |  | ||  __/ ___) || | | |___|  _ <
  |_| |___|_|   |____/ |_| |_____|_| \_\

  Value-betting tips over Telegram
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        bot_name = %cfg.bot.name,
        sports = cfg.odds.sports.len(),
        model = %cfg.llm.model,
        "TIPSTER starting up"
    );

    // -- Initialise components -------------------------------------------

    // The bot cannot run without its token; everything else degrades.
    let telegram_token = config::AppConfig::resolve_env(&cfg.bot.telegram_token_env)?;

    let odds_api_key = std::env::var(&cfg.odds.api_key_env).unwrap_or_default();
    if odds_api_key.is_empty() {
        warn!(
            env = %cfg.odds.api_key_env,
            "No odds API key configured — every sport will come back empty"
        );
    }

    let llm_api_key = std::env::var(&cfg.llm.api_key_env).unwrap_or_default();
    if llm_api_key.is_empty() {
        warn!(
            env = %cfg.llm.api_key_env,
            "No LLM API key configured — picks will carry the fallback tip"
        );
    }

    let source = CachedQuoteSource::new(OddsApiClient::new(
        odds_api_key,
        Some(cfg.odds.regions.clone()),
    )?);
    let annotator = MoonshotClient::new(llm_api_key, Some(cfg.llm.model.clone()))?;

    let pipeline = TipsPipeline::new(
        Box::new(source),
        Box::new(annotator),
        cfg.odds.sports.clone(),
    );

    let bot = TelegramBot::new(telegram_token)?;

    // -- Main loop -------------------------------------------------------

    info!("Entering poll loop. Press Ctrl+C to stop.");

    tokio::select! {
        result = bot.run(&pipeline) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    info!("TIPSTER shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tipster=info"));

    let json_logging = std::env::var("TIPSTER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
