//! The fetch→rank→annotate pipeline.
//!
//! Drives the value-pick core across the configured sport list.
//! Sports are processed sequentially and in configured order — the
//! reply groups picks by sport, not by pick quality. Every failure is
//! contained at its own level: a bad event never aborts a sport and a
//! bad sport never aborts the run.

use tracing::{debug, info, warn};

use crate::llm::{TipAnnotator, FALLBACK_TIP};
use crate::odds::QuoteSource;
use crate::strategy::rank_sport;
use crate::types::{AnnotatedPick, SportReport};

/// Runs the whole tips pipeline for one `/tips` invocation.
pub struct TipsPipeline {
    source: Box<dyn QuoteSource>,
    annotator: Box<dyn TipAnnotator>,
    sports: Vec<String>,
}

impl TipsPipeline {
    pub fn new(
        source: Box<dyn QuoteSource>,
        annotator: Box<dyn TipAnnotator>,
        sports: Vec<String>,
    ) -> Self {
        Self {
            source,
            annotator,
            sports,
        }
    }

    /// Produce a report per sport that yielded at least one qualifying
    /// pick, in configured sport order.
    pub async fn run(&self) -> Vec<SportReport> {
        let mut reports = Vec::new();

        for sport in &self.sports {
            let events = match self.source.fetch_events(sport).await {
                Ok(events) => events,
                Err(e) => {
                    warn!(sport, error = %e, "Odds fetch failed, skipping sport");
                    continue;
                }
            };
            if events.is_empty() {
                debug!(sport, "No events, skipping sport");
                continue;
            }

            let picks = rank_sport(&events);
            if picks.is_empty() {
                debug!(sport, scanned = events.len(), "No qualifying picks");
                continue;
            }

            let sport_name = sport.to_uppercase().replace('_', " ");
            let mut annotated = Vec::with_capacity(picks.len());
            for pick in picks {
                let tip = match self
                    .annotator
                    .annotate(&sport_name, &pick.outcome, pick.best_price, pick.expected_roi)
                    .await
                {
                    Ok(tip) => tip,
                    Err(e) => {
                        warn!(sport, outcome = %pick.outcome, error = %e,
                            "Tip generation failed, using fallback");
                        FALLBACK_TIP.to_string()
                    }
                };
                annotated.push(AnnotatedPick { pick, tip });
            }

            info!(sport, picks = annotated.len(), "Sport ranked");
            reports.push(SportReport {
                sport_key: sport.clone(),
                picks: annotated,
            });
        }

        reports
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
