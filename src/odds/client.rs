//! The Odds API integration.
//!
//! Fetches head-to-head (moneyline) odds across EU and US bookmakers.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4/
//! Auth: `apiKey` query parameter. Quota counted per market region.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use super::QuoteSource;
use crate::types::{BookmakerQuotes, Event, Quote};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// Bookmaker regions to include.
const DEFAULT_REGIONS: &str = "eu,us";

/// Only the moneyline market is used.
const H2H_MARKET: &str = "h2h";

// ---------------------------------------------------------------------------
// API response types (The Odds API JSON → Rust)
// ---------------------------------------------------------------------------

/// One event from `/v4/sports/{sport}/odds`. Only the fields we need
/// are deserialized; everything tolerates absence.
#[derive(Debug, Deserialize)]
struct ApiEvent {
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
    /// ISO-8601 kickoff. Malformed values become None rather than
    /// failing the whole response.
    #[serde(default, deserialize_with = "lenient_datetime")]
    commence_time: Option<DateTime<Utc>>,
    #[serde(default)]
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    #[serde(default)]
    key: String,
    #[serde(default)]
    markets: Vec<ApiMarket>,
}

#[derive(Debug, Deserialize)]
struct ApiMarket {
    #[serde(default)]
    key: String,
    #[serde(default)]
    outcomes: Vec<ApiOutcome>,
}

#[derive(Debug, Deserialize)]
struct ApiOutcome {
    name: String,
    price: f64,
}

/// Accept a timestamp string, a null, or garbage — garbage parses to
/// None instead of erroring.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The Odds API client.
pub struct OddsApiClient {
    http: Client,
    api_key: String,
    regions: String,
}

impl OddsApiClient {
    /// Create a new client. `regions` defaults to "eu,us".
    pub fn new(api_key: String, regions: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("TIPSTER/0.1.0")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            api_key,
            regions: regions.unwrap_or_else(|| DEFAULT_REGIONS.to_string()),
        })
    }

    async fn fetch_raw(&self, sport: &str) -> Result<Vec<ApiEvent>> {
        let url = format!(
            "{BASE_URL}/sports/{}/odds?regions={}&markets={H2H_MARKET}&oddsFormat=decimal&apiKey={}",
            urlencoding::encode(sport),
            urlencoding::encode(&self.regions),
            urlencoding::encode(&self.api_key),
        );

        debug!(sport, "Fetching odds");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Odds API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Odds API error {status}: {body}");
        }

        let events: Vec<ApiEvent> = resp
            .json()
            .await
            .context("Failed to parse Odds API response")?;

        Ok(events)
    }

    /// Convert a wire event to the domain model. Only the h2h market
    /// of each bookmaker is carried over; bookmakers without one
    /// contribute an empty quote set.
    fn to_domain(sport: &str, api: ApiEvent) -> Event {
        let bookmakers = api
            .bookmakers
            .into_iter()
            .map(|bm| BookmakerQuotes {
                bookmaker: bm.key,
                quotes: bm
                    .markets
                    .iter()
                    .find(|m| m.key == H2H_MARKET)
                    .or_else(|| bm.markets.first())
                    .map(|m| {
                        m.outcomes
                            .iter()
                            .map(|o| Quote {
                                name: o.name.clone(),
                                price: o.price,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Event {
            sport_key: sport.to_string(),
            home_team: api.home_team.unwrap_or_default(),
            away_team: api.away_team.unwrap_or_default(),
            commence_time: api.commence_time,
            bookmakers,
        }
    }
}

#[async_trait]
impl QuoteSource for OddsApiClient {
    async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>> {
        // Feed problems degrade to an empty sport, never a hard error.
        match self.fetch_raw(sport).await {
            Ok(events) => Ok(events
                .into_iter()
                .map(|e| Self::to_domain(sport, e))
                .collect()),
            Err(e) => {
                warn!(sport, error = %e, "Odds fetch failed, treating sport as empty");
                Ok(Vec::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "abc123",
        "sport_key": "soccer_epl",
        "commence_time": "2026-09-05T14:00:00Z",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "bookmakers": [
            {
                "key": "pinnacle",
                "title": "Pinnacle",
                "markets": [
                    {
                        "key": "h2h",
                        "outcomes": [
                            {"name": "Arsenal", "price": 2.10},
                            {"name": "Chelsea", "price": 3.40},
                            {"name": "Draw", "price": 3.60}
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_api_event() {
        let api: ApiEvent = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(api.home_team.as_deref(), Some("Arsenal"));
        assert!(api.commence_time.is_some());
        assert_eq!(api.bookmakers.len(), 1);
        assert_eq!(api.bookmakers[0].markets[0].outcomes.len(), 3);
    }

    #[test]
    fn test_parse_missing_fields() {
        let api: ApiEvent = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(api.home_team.is_none());
        assert!(api.commence_time.is_none());
        assert!(api.bookmakers.is_empty());
    }

    #[test]
    fn test_malformed_commence_time_is_none() {
        let api: ApiEvent =
            serde_json::from_str(r#"{"commence_time": "not-a-date"}"#).unwrap();
        assert!(api.commence_time.is_none());
    }

    #[test]
    fn test_null_commence_time_is_none() {
        let api: ApiEvent = serde_json::from_str(r#"{"commence_time": null}"#).unwrap();
        assert!(api.commence_time.is_none());
    }

    #[test]
    fn test_to_domain() {
        let api: ApiEvent = serde_json::from_str(SAMPLE).unwrap();
        let event = OddsApiClient::to_domain("soccer_epl", api);
        assert_eq!(event.sport_key, "soccer_epl");
        assert_eq!(event.fixture(), "Arsenal vs Chelsea");
        assert_eq!(event.bookmakers.len(), 1);
        assert_eq!(event.bookmakers[0].bookmaker, "pinnacle");
        assert_eq!(event.bookmakers[0].quotes.len(), 3);
        assert_eq!(event.bookmakers[0].price_for("Draw"), Some(3.60));
    }

    #[test]
    fn test_to_domain_bookmaker_without_h2h() {
        let api: ApiEvent = serde_json::from_str(
            r#"{
                "home_team": "A",
                "away_team": "B",
                "bookmakers": [{"key": "bookx", "markets": []}]
            }"#,
        )
        .unwrap();
        let event = OddsApiClient::to_domain("tennis_atp", api);
        assert_eq!(event.bookmakers.len(), 1);
        assert!(event.bookmakers[0].quotes.is_empty());
    }

    #[test]
    fn test_client_construction() {
        let client = OddsApiClient::new("key".into(), None).unwrap();
        assert_eq!(client.regions, "eu,us");

        let client = OddsApiClient::new("key".into(), Some("uk".into())).unwrap();
        assert_eq!(client.regions, "uk");
    }
}
