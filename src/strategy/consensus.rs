//! Consensus fair-probability estimation.
//!
//! Turns one event's bookmaker quotes into a de-vigged "fair"
//! probability per outcome. Each bookmaker's implied probabilities are
//! normalized by their own sum to strip its margin, then a per-outcome
//! median is taken across bookmakers — excluding, for each outcome,
//! any bookmaker offering the best price on it, so a lone mispriced
//! quote cannot validate itself.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::types::Event;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an event cannot be scored. All of these are recovered at
/// the event level: the caller skips the event and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimationError {
    #[error("fewer than 2 distinct outcomes quoted")]
    InsufficientOutcomes,

    #[error("no bookmaker with a nonzero implied-probability sum")]
    NoUsableBookmaker,

    #[error("no consensus candidates for outcome {0}")]
    NoConsensus(String),

    #[error("consensus probabilities sum to zero")]
    ZeroConsensus,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The estimator's output for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct FairEstimate {
    /// Outcome universe, sorted lexicographically. All iteration over
    /// outcomes follows this order, which makes downstream tie-breaks
    /// deterministic.
    pub outcomes: Vec<String>,
    /// Fair probability per outcome; covers every universe entry and
    /// sums to 1.
    pub fair_probs: HashMap<String, f64>,
    /// Maximum price any usable bookmaker offers per outcome — the
    /// price a bettor can actually get.
    pub best_prices: HashMap<String, f64>,
}

/// One bookmaker's view after de-vigging.
struct DeviggedBook {
    prices: HashMap<String, f64>,
    vig_free: HashMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Estimate fair probabilities and best available prices for an event.
pub fn estimate_fair_probabilities(event: &Event) -> Result<FairEstimate, EstimationError> {
    // 1. Outcome universe across all bookmakers.
    let mut names = BTreeSet::new();
    for book in &event.bookmakers {
        for quote in &book.quotes {
            names.insert(quote.name.clone());
        }
    }
    if event.bookmakers.is_empty() || names.len() < 2 {
        return Err(EstimationError::InsufficientOutcomes);
    }
    let outcomes: Vec<String> = names.into_iter().collect();

    // 2–3. Per-bookmaker de-vigged probability vectors, tracking the
    // best offered price per outcome along the way.
    let mut books: Vec<DeviggedBook> = Vec::with_capacity(event.bookmakers.len());
    let mut best_prices: HashMap<String, f64> = HashMap::new();

    for book in &event.bookmakers {
        let mut prices: HashMap<String, f64> = HashMap::new();
        for quote in &book.quotes {
            // Duplicate outcome names within one set: last quote wins.
            prices.insert(quote.name.clone(), quote.price);
        }

        let total_implied: f64 = outcomes
            .iter()
            .filter_map(|name| prices.get(name))
            .map(|price| 1.0 / price)
            .sum();
        if total_implied == 0.0 {
            debug!(bookmaker = %book.bookmaker, "No usable quotes, skipping bookmaker");
            continue;
        }

        let mut vig_free: HashMap<String, f64> = HashMap::new();
        for name in &outcomes {
            let implied = prices.get(name).map(|p| 1.0 / p).unwrap_or(0.0);
            vig_free.insert(name.clone(), implied / total_implied);

            if let Some(&price) = prices.get(name) {
                let entry = best_prices.entry(name.clone()).or_insert(price);
                if price > *entry {
                    *entry = price;
                }
            }
        }

        books.push(DeviggedBook { prices, vig_free });
    }

    // 4. Need at least one usable bookmaker.
    if books.is_empty() {
        return Err(EstimationError::NoUsableBookmaker);
    }

    // 5–6. Per-outcome median consensus, excluding any bookmaker whose
    // price on that outcome equals the best price.
    let mut consensus: HashMap<String, f64> = HashMap::new();
    for name in outcomes.iter() {
        let best = best_prices.get(name).copied();

        let mut candidates: Vec<f64> = books
            .iter()
            .filter(|b| match (b.prices.get(name), best) {
                (Some(&price), Some(best_price)) => price != best_price,
                _ => true,
            })
            .map(|b| b.vig_free[name])
            .filter(|&p| p > 0.0)
            .collect();

        if candidates.is_empty() {
            // Fall back to every bookmaker quoting a nonzero
            // probability, the excluded one included.
            candidates = books
                .iter()
                .map(|b| b.vig_free[name])
                .filter(|&p| p > 0.0)
                .collect();
            if candidates.is_empty() {
                return Err(EstimationError::NoConsensus(name.clone()));
            }
        }

        consensus.insert(name.clone(), median(&mut candidates));
    }

    // 7. Renormalize to correct mass lost to per-outcome exclusions.
    let total_consensus: f64 = consensus.values().sum();
    if total_consensus == 0.0 {
        return Err(EstimationError::ZeroConsensus);
    }

    let fair_probs: HashMap<String, f64> = consensus
        .into_iter()
        .map(|(name, p)| (name, p / total_consensus))
        .collect();

    Ok(FairEstimate {
        outcomes,
        fair_probs,
        best_prices,
    })
}

/// Standard median: middle of the sorted values for odd counts, the
/// average of the two middle values for even counts.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
