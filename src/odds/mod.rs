//! Bookmaker odds retrieval.
//!
//! Defines the `QuoteSource` trait plus The Odds API implementation
//! and a time-bucketed memoization layer.

pub mod cache;
pub mod client;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Event;

/// Abstraction over per-sport odds feeds.
///
/// Implementors return every upcoming event for a sport with its
/// nested bookmaker quote sets. A fetch problem is expected to degrade
/// to an empty list at the implementation boundary; `Err` is reserved
/// for conditions the caller might want to distinguish (none today,
/// but tests use it to simulate feed failure).
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch upcoming events for a sport key, e.g. "soccer_epl".
    async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>>;
}
