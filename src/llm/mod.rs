//! LLM integration for pick narratives.
//!
//! Defines the `TipAnnotator` trait and the Moonshot (Kimi)
//! implementation that turns a qualifying pick into a short
//! persuasive tip.

pub mod moonshot;

use anyhow::Result;
use async_trait::async_trait;

/// Fallback narrative used when annotation fails outright. Ranking is
/// never blocked on tip generation.
pub const FALLBACK_TIP: &str =
    "Analysis suggests high value in this pick based on odds comparison.";

/// Abstraction over narrative tip generators.
#[async_trait]
pub trait TipAnnotator: Send + Sync {
    /// Produce a short narrative for a qualifying pick.
    ///
    /// `expected_roi` is the fractional edge (0.05 = 5%). Errors are
    /// substituted with [`FALLBACK_TIP`] by the caller; implementors
    /// should not retry.
    async fn annotate(
        &self,
        sport_name: &str,
        outcome: &str,
        best_price: f64,
        expected_roi: f64,
    ) -> Result<String>;
}
