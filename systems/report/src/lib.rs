#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composes per-round kill and gold summaries.

use std::fmt::Write as _;

use round_recap_core::{
    PendingReport, PlayerDelta, ReportSkip, RoundReport, StatsDelta, StatsSnapshot,
};

/// Rule drawn above and below the report rows.
pub const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━";

/// Pure system that diffs a pending report against its end snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportComposer;

impl ReportComposer {
    /// Creates a new report composer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Explains why `compose` would produce nothing for these inputs.
    #[must_use]
    pub fn skip_reason(&self, pending: &PendingReport, end: &StatsSnapshot) -> Option<ReportSkip> {
        if pending.round_start().is_empty() {
            Some(ReportSkip::EmptyBaseline)
        } else if end.is_empty() {
            Some(ReportSkip::EmptyEnd)
        } else {
            None
        }
    }

    /// Diffs `end` against the pending report's snapshots and renders the result.
    ///
    /// Only players present in both the baseline and `end` get a row. Rows are
    /// sorted by descending round kills; ties keep name order.
    #[must_use]
    pub fn compose(&self, pending: &PendingReport, end: &StatsSnapshot) -> Option<RoundReport> {
        if self.skip_reason(pending, end).is_some() {
            return None;
        }

        let mut rows: Vec<PlayerDelta> = end
            .iter()
            .filter_map(|(player, end_stats)| {
                let start = pending.round_start().get(player)?;
                let last_wave = pending
                    .last_wave_start()
                    .get(player)
                    .map(|wave_start| StatsDelta::between(wave_start, end_stats));
                Some(PlayerDelta::new(
                    player,
                    StatsDelta::between(start, end_stats),
                    last_wave,
                ))
            })
            .collect();
        rows.sort_by(|a, b| b.round().kills().cmp(&a.round().kills()));

        let text = render(&rows);
        Some(RoundReport::new(pending.round(), rows, text))
    }
}

fn render(rows: &[PlayerDelta]) -> String {
    let width = rows
        .iter()
        .map(|row| row.player().chars().count())
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    text.push_str(DIVIDER);
    text.push('\n');
    for row in rows {
        let padding = width - row.player().chars().count() + 1;
        let round = row.round();
        let last_wave = row.last_wave().unwrap_or_default();
        let _ = writeln!(
            text,
            "{}:{:padding$}{}/{}  |  {}/{}",
            row.player(),
            "",
            round.kills(),
            round.gold(),
            last_wave.kills(),
            last_wave.gold(),
        );
    }
    text.push_str(DIVIDER);
    text
}
