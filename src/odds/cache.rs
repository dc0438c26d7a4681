//! Time-bucketed odds memoization.
//!
//! The pipeline may run several times within a few minutes (every
//! `/tips` command). To avoid burning API quota, fetches are memoized
//! on `(sport, time_bucket)` where a bucket is a 15-minute window.
//! The cache has no bearing on scoring correctness; it only bounds
//! redundant network calls.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use super::QuoteSource;
use crate::types::Event;

/// Bucket width in seconds (15 minutes).
pub const BUCKET_SECS: i64 = 900;

/// Maximum cached entries before the oldest insertion is evicted.
const MAX_ENTRIES: usize = 32;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Bounded map from `(sport, time_bucket)` to a fetched event list.
///
/// Kept as an explicit object (rather than memoized-function state) so
/// tests can substitute a fresh or pre-seeded instance.
pub struct OddsCache {
    entries: HashMap<(String, i64), Vec<Event>>,
    /// Insertion order for eviction.
    order: Vec<(String, i64)>,
}

impl OddsCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Look up the events cached for a sport in a time bucket.
    pub fn get(&self, sport: &str, bucket: i64) -> Option<&Vec<Event>> {
        self.entries.get(&(sport.to_string(), bucket))
    }

    /// Store a fetch result, evicting the oldest entry at capacity.
    pub fn put(&mut self, sport: &str, bucket: i64, events: Vec<Event>) {
        let key = (sport.to_string(), bucket);
        if !self.entries.contains_key(&key) {
            if self.order.len() >= MAX_ENTRIES {
                let oldest = self.order.remove(0);
                self.entries.remove(&oldest);
            }
            self.order.push(key.clone());
        }
        self.entries.insert(key, events);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The bucket containing a unix timestamp.
    pub fn bucket_for(unix_secs: i64) -> i64 {
        unix_secs.div_euclid(BUCKET_SECS)
    }
}

impl Default for OddsCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

/// Wraps any `QuoteSource` with the time-bucketed cache.
pub struct CachedQuoteSource<S: QuoteSource> {
    inner: S,
    cache: Mutex<OddsCache>,
}

impl<S: QuoteSource> CachedQuoteSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(OddsCache::new()),
        }
    }

    fn current_bucket() -> i64 {
        OddsCache::bucket_for(chrono::Utc::now().timestamp())
    }
}

#[async_trait]
impl<S: QuoteSource> QuoteSource for CachedQuoteSource<S> {
    async fn fetch_events(&self, sport: &str) -> Result<Vec<Event>> {
        let bucket = Self::current_bucket();

        if let Some(events) = self
            .cache
            .lock()
            .expect("odds cache lock poisoned")
            .get(sport, bucket)
        {
            debug!(sport, bucket, "Odds cache hit");
            return Ok(events.clone());
        }

        let events = self.inner.fetch_events(sport).await?;

        self.cache
            .lock()
            .expect("odds cache lock poisoned")
            .put(sport, bucket, events.clone());

        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
