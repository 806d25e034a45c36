#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reconciles the scoreboard sidebar with the player list into one stats snapshot.
//!
//! Gold is only rendered in the sidebar, next to a display name that may carry
//! rank tags or different casing. Kills and the canonical account name come from
//! the player list. The reconciler pairs the two through an ordered cascade of
//! [`NameMatcher`] strategies and keys every result by the canonical name.

mod matching;
mod parsing;

use std::ops::RangeInclusive;

use round_recap_core::{PlayerListEntry, PlayerStats, StatsSnapshot};

pub use matching::{find_match, MatchThresholds, NameMatcher, MATCH_CASCADE};

use parsing::ScoreboardRow;

/// Sidebar rows above the scoreboard that hold status lines.
pub const DEFAULT_SIDEBAR_HEADER_ROWS: usize = 5;
/// Character lengths accepted for player list names.
pub const DEFAULT_NAME_LEN: RangeInclusive<usize> = 3..=16;
/// Leading character reserved for non-player list entries.
pub const DEFAULT_RESERVED_PREFIX: char = '!';

/// Configuration for the stats reconciler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    sidebar_header_rows: usize,
    name_len: RangeInclusive<usize>,
    reserved_prefix: char,
    thresholds: MatchThresholds,
}

impl Config {
    /// Creates a new reconciler configuration.
    ///
    /// The first `sidebar_header_rows` sidebar rows hold status lines and are
    /// never parsed. Player list names outside `name_len` characters or starting
    /// with `reserved_prefix` belong to non-player entries.
    #[must_use]
    pub fn new(
        sidebar_header_rows: usize,
        name_len: RangeInclusive<usize>,
        reserved_prefix: char,
        thresholds: MatchThresholds,
    ) -> Self {
        Self {
            sidebar_header_rows,
            name_len,
            reserved_prefix,
            thresholds,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SIDEBAR_HEADER_ROWS,
            DEFAULT_NAME_LEN,
            DEFAULT_RESERVED_PREFIX,
            MatchThresholds::default(),
        )
    }
}

/// Pure system that captures stats snapshots from the observed game surface.
#[derive(Clone, Debug, Default)]
pub struct StatsReconciler {
    config: Config,
}

impl StatsReconciler {
    /// Creates a new reconciler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds a snapshot keyed by canonical player names.
    ///
    /// Players whose sidebar row cannot be found are recorded with zero gold.
    /// Calling this twice with the same inputs yields identical snapshots.
    #[must_use]
    pub fn capture<S>(&self, sidebar_lines: &[S], entries: &[PlayerListEntry]) -> StatsSnapshot
    where
        S: AsRef<str>,
    {
        let rows: Vec<ScoreboardRow> = sidebar_lines
            .iter()
            .skip(self.config.sidebar_header_rows)
            .filter_map(|line| parsing::parse_scoreboard_line(line.as_ref()))
            .collect();
        let row_names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();

        let mut snapshot = StatsSnapshot::new();
        for entry in entries {
            let name = entry.name();
            if !self.is_player(name) {
                continue;
            }

            let kills = match entry.objective_score() {
                Some(score) => u32::try_from(score).unwrap_or(0),
                None => entry
                    .display_text()
                    .map_or(0, |display| parsing::kills_from_display(display, name)),
            };

            let gold = match find_match(name, &row_names, &self.config.thresholds) {
                Some((_, index)) => rows[index].gold,
                None => {
                    tracing::debug!(player = name, rows = rows.len(), "no sidebar row matched player");
                    0
                }
            };

            snapshot.insert(name, PlayerStats::new(kills, gold));
        }
        snapshot
    }

    fn is_player(&self, name: &str) -> bool {
        !name.starts_with(self.config.reserved_prefix)
            && self.config.name_len.contains(&name.chars().count())
    }
}
