//! Reply rendering.
//!
//! Assembles the user-facing markdown message from ranked sport
//! reports. Pure string work; Telegram specifics live in `bot`.

use crate::types::SportReport;

/// Responsible-gambling footer, always appended.
pub const FOOTER: &str = "\n\n---\n⚠️ 18+ | Gamble responsibly | begambleaware.org";

/// Shown when no sport produced a qualifying pick.
pub const EMPTY_MESSAGE: &str = "No games with value picks found today.";

/// Render all reports into one markdown message.
pub fn render(reports: &[SportReport]) -> String {
    if reports.is_empty() {
        return format!("{EMPTY_MESSAGE}{FOOTER}");
    }

    let blocks: Vec<String> = reports.iter().map(render_sport).collect();
    format!("{}{FOOTER}", blocks.join("\n\n"))
}

fn render_sport(report: &SportReport) -> String {
    let mut lines = vec![format!(
        "🏆 **{}** ({} Value Picks Found)",
        report.sport_name(),
        report.picks.len(),
    )];

    for (i, annotated) in report.picks.iter().enumerate() {
        let pick = &annotated.pick;
        let kickoff = pick
            .event
            .commence_time
            .map(|t| t.format("%b %d, %H:%M UTC").to_string())
            .unwrap_or_default();

        lines.push(format!(
            "**{}.** {}\n   **Pick:** {} @ {:.2} (Edge: {:.1}%)\n   **Time:** {}\n   _Kimi Tip:_ {}",
            i + 1,
            pick.event.fixture(),
            pick.outcome,
            pick.best_price,
            pick.edge_pct(),
            kickoff,
            annotated.tip,
        ));
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::types::{AnnotatedPick, BookmakerQuotes, Event, Quote, ValuePick};

    fn make_report(with_time: bool) -> SportReport {
        let commence_time = if with_time {
            Some(chrono::Utc.with_ymd_and_hms(2026, 9, 5, 14, 30, 0).unwrap())
        } else {
            None
        };
        SportReport {
            sport_key: "soccer_epl".to_string(),
            picks: vec![AnnotatedPick {
                pick: ValuePick {
                    event: Event {
                        sport_key: "soccer_epl".to_string(),
                        home_team: "Arsenal".to_string(),
                        away_team: "Chelsea".to_string(),
                        commence_time,
                        bookmakers: vec![BookmakerQuotes {
                            bookmaker: "bookx".to_string(),
                            quotes: vec![Quote {
                                name: "Arsenal".to_string(),
                                price: 2.35,
                            }],
                        }],
                    },
                    outcome: "Arsenal".to_string(),
                    best_price: 2.35,
                    expected_roi: 0.081,
                },
                tip: "Arsenal are flying at home.".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_empty() {
        let msg = render(&[]);
        assert!(msg.starts_with(EMPTY_MESSAGE));
        assert!(msg.contains("begambleaware.org"));
    }

    #[test]
    fn test_render_pick_block() {
        let msg = render(&[make_report(true)]);
        assert!(msg.contains("🏆 **SOCCER EPL** (1 Value Picks Found)"));
        assert!(msg.contains("**1.** Arsenal vs Chelsea"));
        assert!(msg.contains("**Pick:** Arsenal @ 2.35 (Edge: 8.1%)"));
        assert!(msg.contains("**Time:** Sep 05, 14:30 UTC"));
        assert!(msg.contains("_Kimi Tip:_ Arsenal are flying at home."));
        assert!(msg.ends_with(FOOTER));
    }

    #[test]
    fn test_render_missing_kickoff_blank() {
        let msg = render(&[make_report(false)]);
        assert!(msg.contains("**Time:** \n"));
    }

    #[test]
    fn test_render_multiple_sports_separated() {
        let mut second = make_report(true);
        second.sport_key = "tennis_atp".to_string();
        let msg = render(&[make_report(true), second]);
        assert!(msg.contains("SOCCER EPL"));
        assert!(msg.contains("TENNIS ATP"));
        // Sport blocks separated by a blank line.
        assert!(msg.contains("\n\n🏆 **TENNIS ATP**"));
    }

    #[test]
    fn test_render_numbers_picks_sequentially() {
        let mut report = make_report(true);
        let mut extra = report.picks[0].clone();
        extra.pick.outcome = "Chelsea".to_string();
        report.picks.push(extra);
        let msg = render(&[report]);
        assert!(msg.contains("**1.**"));
        assert!(msg.contains("**2.**"));
    }
}
