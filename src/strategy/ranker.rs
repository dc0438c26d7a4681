//! Per-sport ranking.
//!
//! Runs estimation and selection across a sport's events, drops
//! everything that fails or doesn't qualify, and returns the top picks
//! in descending expected-ROI order.

use tracing::debug;

use super::consensus::estimate_fair_probabilities;
use super::selector::select_value;
use crate::types::{Event, ValuePick};

/// Maximum picks surfaced per sport.
pub const MAX_PICKS_PER_SPORT: usize = 5;

/// Rank a sport's events into at most [`MAX_PICKS_PER_SPORT`] value
/// picks, descending by expected ROI.
///
/// Events that are unscoreable, or whose best edge is below the
/// threshold, are silently dropped — this is a filter, not an error.
/// An empty result means the sport has nothing worth backing today.
pub fn rank_sport(events: &[Event]) -> Vec<ValuePick> {
    let mut picks: Vec<ValuePick> = Vec::new();

    for event in events {
        let estimate = match estimate_fair_probabilities(event) {
            Ok(est) => est,
            Err(reason) => {
                debug!(event = %event, %reason, "Event unscoreable, skipped");
                continue;
            }
        };

        if let Some(value) = select_value(&estimate) {
            picks.push(ValuePick {
                event: event.clone(),
                outcome: value.outcome,
                best_price: value.best_price,
                expected_roi: value.expected_roi,
            });
        }
    }

    // Stable sort keeps original event order among equal edges.
    picks.sort_by(|a, b| b.expected_roi.total_cmp(&a.expected_roi));
    picks.truncate(MAX_PICKS_PER_SPORT);
    picks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
