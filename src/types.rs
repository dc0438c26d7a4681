//! Shared types for the TIPSTER bot.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that odds, strategy, and
//! engine modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// A single quoted outcome from one bookmaker: decimal odds for a
/// named outcome. The reciprocal of the price is the bookmaker's
/// implied probability for the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    /// Decimal odds, always > 1.0 for a real quote.
    pub price: f64,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2}", self.name, self.price)
    }
}

impl Quote {
    /// Implied probability (1 / price).
    pub fn implied_probability(&self) -> f64 {
        1.0 / self.price
    }
}

/// One bookmaker's head-to-head quotes for one event. Covers a subset
/// (ideally all) of the event's outcomes. Duplicate outcome names are
/// resolved last-wins when the set is indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmakerQuotes {
    /// Bookmaker identifier, e.g. "pinnacle" or "bet365".
    pub bookmaker: String,
    pub quotes: Vec<Quote>,
}

impl fmt::Display for BookmakerQuotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quotes: Vec<String> = self.quotes.iter().map(|q| q.to_string()).collect();
        write!(f, "[{}] {}", self.bookmaker, quotes.join(" | "))
    }
}

impl BookmakerQuotes {
    /// Price for a named outcome, if this bookmaker quotes it.
    /// With duplicate names the last quote wins.
    pub fn price_for(&self, outcome: &str) -> Option<f64> {
        self.quotes
            .iter()
            .rev()
            .find(|q| q.name == outcome)
            .map(|q| q.price)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A single fixture with quotes from multiple bookmakers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Sport identifier, e.g. "soccer_epl".
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    /// Kickoff time. Absent or malformed upstream values become None.
    pub commence_time: Option<DateTime<Utc>>,
    pub bookmakers: Vec<BookmakerQuotes>,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} ({} bookmakers)",
            self.sport_key,
            self.home_team,
            self.away_team,
            self.bookmakers.len(),
        )
    }
}

impl Event {
    /// Fixture identity string, e.g. "Arsenal vs Chelsea".
    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Helper to build a test/sample event with two bookmakers.
    #[cfg(test)]
    pub fn sample() -> Self {
        Event {
            sport_key: "soccer_epl".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            commence_time: Some(Utc::now() + chrono::Duration::days(2)),
            bookmakers: vec![
                BookmakerQuotes {
                    bookmaker: "bookx".to_string(),
                    quotes: vec![
                        Quote { name: "Arsenal".to_string(), price: 2.00 },
                        Quote { name: "Chelsea".to_string(), price: 1.80 },
                    ],
                },
                BookmakerQuotes {
                    bookmaker: "booky".to_string(),
                    quotes: vec![
                        Quote { name: "Arsenal".to_string(), price: 1.90 },
                        Quote { name: "Chelsea".to_string(), price: 2.00 },
                    ],
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Picks & reports
// ---------------------------------------------------------------------------

/// A qualifying value pick: the single best-expected-ROI outcome of an
/// event, at the best price any bookmaker offers for it. Produced only
/// when the expected ROI clears the acceptance threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuePick {
    pub event: Event,
    pub outcome: String,
    pub best_price: f64,
    /// fair_probability * best_price - 1
    pub expected_roi: f64,
}

impl fmt::Display for ValuePick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @ {:.2} (edge {:.1}%)",
            self.event.fixture(),
            self.outcome,
            self.best_price,
            self.expected_roi * 100.0,
        )
    }
}

impl ValuePick {
    /// Edge as a percentage, for presentation.
    pub fn edge_pct(&self) -> f64 {
        self.expected_roi * 100.0
    }
}

/// A value pick with its narrative tip attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedPick {
    pub pick: ValuePick,
    pub tip: String,
}

/// Ranked picks for one sport, in descending expected-ROI order.
/// Only produced for sports that yielded at least one pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportReport {
    pub sport_key: String,
    pub picks: Vec<AnnotatedPick>,
}

impl fmt::Display for SportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} picks", self.sport_key, self.picks.len())
    }
}

impl SportReport {
    /// Human-readable sport name: "soccer_epl" → "SOCCER EPL".
    pub fn sport_name(&self) -> String {
        self.sport_key.to_uppercase().replace('_', " ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Quote tests --

    #[test]
    fn test_quote_implied_probability() {
        let q = Quote { name: "Arsenal".to_string(), price: 2.0 };
        assert!((q.implied_probability() - 0.5).abs() < 1e-9);

        let q = Quote { name: "Chelsea".to_string(), price: 4.0 };
        assert!((q.implied_probability() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_quote_display() {
        let q = Quote { name: "Draw".to_string(), price: 3.456 };
        assert_eq!(format!("{q}"), "Draw @ 3.46");
    }

    #[test]
    fn test_quote_serialization_roundtrip() {
        let q = Quote { name: "Arsenal".to_string(), price: 2.15 };
        let json = serde_json::to_string(&q).unwrap();
        let parsed: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Arsenal");
        assert!((parsed.price - 2.15).abs() < 1e-10);
    }

    // -- BookmakerQuotes tests --

    #[test]
    fn test_price_for_present() {
        let set = BookmakerQuotes {
            bookmaker: "bookx".to_string(),
            quotes: vec![
                Quote { name: "A".to_string(), price: 2.0 },
                Quote { name: "B".to_string(), price: 1.8 },
            ],
        };
        assert_eq!(set.price_for("A"), Some(2.0));
        assert_eq!(set.price_for("B"), Some(1.8));
    }

    #[test]
    fn test_price_for_absent() {
        let set = BookmakerQuotes {
            bookmaker: "bookx".to_string(),
            quotes: vec![Quote { name: "A".to_string(), price: 2.0 }],
        };
        assert_eq!(set.price_for("C"), None);
    }

    #[test]
    fn test_price_for_duplicate_last_wins() {
        let set = BookmakerQuotes {
            bookmaker: "bookx".to_string(),
            quotes: vec![
                Quote { name: "A".to_string(), price: 2.0 },
                Quote { name: "A".to_string(), price: 2.5 },
            ],
        };
        assert_eq!(set.price_for("A"), Some(2.5));
    }

    #[test]
    fn test_bookmaker_quotes_display() {
        let set = BookmakerQuotes {
            bookmaker: "bookx".to_string(),
            quotes: vec![Quote { name: "A".to_string(), price: 2.0 }],
        };
        let display = format!("{set}");
        assert!(display.contains("bookx"));
        assert!(display.contains("A @ 2.00"));
    }

    // -- Event tests --

    #[test]
    fn test_event_fixture() {
        let event = Event::sample();
        assert_eq!(event.fixture(), "Arsenal vs Chelsea");
    }

    #[test]
    fn test_event_display() {
        let event = Event::sample();
        let display = format!("{event}");
        assert!(display.contains("soccer_epl"));
        assert!(display.contains("2 bookmakers"));
    }

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = Event::sample();
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.home_team, "Arsenal");
        assert_eq!(parsed.bookmakers.len(), 2);
        assert!(parsed.commence_time.is_some());
    }

    #[test]
    fn test_event_optional_commence_time() {
        let mut event = Event::sample();
        event.commence_time = None;
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert!(parsed.commence_time.is_none());
    }

    // -- ValuePick tests --

    #[test]
    fn test_value_pick_edge_pct() {
        let pick = ValuePick {
            event: Event::sample(),
            outcome: "Arsenal".to_string(),
            best_price: 3.0,
            expected_roi: 0.445,
        };
        assert!((pick.edge_pct() - 44.5).abs() < 1e-9);
    }

    #[test]
    fn test_value_pick_display() {
        let pick = ValuePick {
            event: Event::sample(),
            outcome: "Arsenal".to_string(),
            best_price: 3.0,
            expected_roi: 0.445,
        };
        let display = format!("{pick}");
        assert!(display.contains("Arsenal vs Chelsea"));
        assert!(display.contains("3.00"));
        assert!(display.contains("44.5%"));
    }

    // -- SportReport tests --

    #[test]
    fn test_sport_report_name() {
        let report = SportReport {
            sport_key: "soccer_germany_bundesliga".to_string(),
            picks: Vec::new(),
        };
        assert_eq!(report.sport_name(), "SOCCER GERMANY BUNDESLIGA");
    }

    #[test]
    fn test_sport_report_serialization_roundtrip() {
        let report = SportReport {
            sport_key: "tennis_atp".to_string(),
            picks: vec![AnnotatedPick {
                pick: ValuePick {
                    event: Event::sample(),
                    outcome: "Arsenal".to_string(),
                    best_price: 2.0,
                    expected_roi: 0.08,
                },
                tip: "Solid value.".to_string(),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: SportReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sport_key, "tennis_atp");
        assert_eq!(parsed.picks.len(), 1);
        assert_eq!(parsed.picks[0].tip, "Solid value.");
    }
}
