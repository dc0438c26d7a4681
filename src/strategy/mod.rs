//! Value-pick detection strategy.
//!
//! Three stages, each pure and synchronous: consensus fair-probability
//! estimation from bookmaker quotes, expected-ROI value selection, and
//! per-sport ranking.

pub mod consensus;
pub mod ranker;
pub mod selector;

pub use consensus::{estimate_fair_probabilities, EstimationError, FairEstimate};
pub use ranker::{rank_sport, MAX_PICKS_PER_SPORT};
pub use selector::{select_value, ValueOutcome, ROI_THRESHOLD};
