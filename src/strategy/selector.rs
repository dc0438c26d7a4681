//! Value selection.
//!
//! Given fair probabilities and best available prices for one event,
//! picks the single highest-expected-ROI outcome — or nothing, when no
//! outcome clears the acceptance threshold.

use tracing::debug;

use super::consensus::FairEstimate;

/// Minimum expected ROI for a pick to qualify. A fixed design
/// constant, not user-configurable.
pub const ROI_THRESHOLD: f64 = 0.05;

/// The winning outcome of an event, before the event itself is
/// attached (see `ranker`).
#[derive(Debug, Clone, PartialEq)]
pub struct ValueOutcome {
    pub outcome: String,
    pub best_price: f64,
    pub expected_roi: f64,
}

/// Select the best-ROI outcome if it clears the threshold.
///
/// Outcomes are visited in the estimate's lexicographic order and the
/// maximum is kept under strict comparison, so exact ROI ties go to
/// the lexicographically smallest outcome name.
pub fn select_value(estimate: &FairEstimate) -> Option<ValueOutcome> {
    let mut best: Option<ValueOutcome> = None;

    for name in &estimate.outcomes {
        let Some(&price) = estimate.best_prices.get(name) else {
            continue;
        };
        let fair_prob = estimate.fair_probs[name];
        let expected_roi = fair_prob * price - 1.0;

        if best
            .as_ref()
            .map(|b| expected_roi > b.expected_roi)
            .unwrap_or(true)
        {
            best = Some(ValueOutcome {
                outcome: name.clone(),
                best_price: price,
                expected_roi,
            });
        }
    }

    let best = best?;
    if best.expected_roi >= ROI_THRESHOLD {
        debug!(
            outcome = %best.outcome,
            price = best.best_price,
            roi = format!("{:.1}%", best.expected_roi * 100.0),
            "Value pick qualifies"
        );
        Some(best)
    } else {
        debug!(
            outcome = %best.outcome,
            roi = format!("{:.1}%", best.expected_roi * 100.0),
            "Best edge below threshold, no pick"
        );
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
