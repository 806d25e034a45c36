#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave timing for the round recap.
//!
//! The game never announces waves, so the recap estimates them: an
//! [`ElapsedClock`] measures wall-clock time since the round title appeared and a
//! [`WaveEstimator`] compares it against the expected wave-start offsets stored in
//! a [`TimingTable`].

mod maps;

use std::time::Instant;

use thiserror::Error;

pub use maps::{MapKind, ParseMapError};

/// Upper bound on plausible elapsed time within a single round.
pub const DEFAULT_MAX_ELAPSED_MS: u32 = 300_000;

const MILLIS_PER_SECOND: u64 = 1_000;

/// Reasons a timing table row is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TimingTableError {
    /// Offsets within a row must strictly increase.
    #[error("round {round} offsets are not strictly ascending")]
    Unordered {
        /// One-based round whose row was rejected.
        round: u32,
    },
}

/// Expected wave-start offsets in seconds, one row per round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingTable {
    rows: Vec<Vec<u32>>,
}

impl TimingTable {
    /// Creates a table after checking that every row is strictly ascending.
    ///
    /// Row `i` describes round `i + 1`.
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self, TimingTableError> {
        for (index, row) in rows.iter().enumerate() {
            if row.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(TimingTableError::Unordered {
                    round: u32::try_from(index + 1).unwrap_or(u32::MAX),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Creates a table that knows no rounds.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Offsets in seconds for the provided round, empty when the round is unknown.
    #[must_use]
    pub fn offsets(&self, round: u32) -> &[u32] {
        round
            .checked_sub(1)
            .and_then(|index| self.rows.get(index as usize))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Index of the round's final wave, zero when the round is unknown.
    #[must_use]
    pub fn last_wave(&self, round: u32) -> u32 {
        u32::try_from(self.offsets(round).len()).unwrap_or(u32::MAX)
    }

    /// Predicted start of the round's final wave in milliseconds.
    #[must_use]
    pub fn last_wave_offset_ms(&self, round: u32) -> Option<u32> {
        self.offsets(round)
            .last()
            .map(|seconds| seconds.saturating_mul(MILLIS_PER_SECOND as u32))
    }

    /// Number of rounds the table describes.
    #[must_use]
    pub fn max_round(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }
}

/// Wall-clock stopwatch started by a round title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ElapsedClock {
    started_at: Option<Instant>,
}

impl ElapsedClock {
    /// Creates a stopped clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts the clock at the provided instant.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    /// Stops the clock; subsequent reads return zero.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Reports whether the clock has been started and not stopped since.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds between the start instant and `now`.
    ///
    /// Returns zero when stopped or when `now` precedes the start, and saturates
    /// at `u32::MAX`.
    #[must_use]
    pub fn elapsed_ms(&self, now: Instant) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        now.checked_duration_since(started_at)
            .map_or(0, |elapsed| u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX))
    }
}

/// Configuration for the wave estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_elapsed_ms: u32,
}

impl Config {
    /// Creates a configuration that treats elapsed times above `max_elapsed_ms` as bogus.
    #[must_use]
    pub const fn new(max_elapsed_ms: u32) -> Self {
        Self { max_elapsed_ms }
    }

    /// Largest elapsed time the estimator trusts.
    #[must_use]
    pub const fn max_elapsed_ms(&self) -> u32 {
        self.max_elapsed_ms
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ELAPSED_MS)
    }
}

/// Estimates the current wave from elapsed round time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveEstimator {
    config: Config,
}

impl WaveEstimator {
    /// Creates an estimator using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wave index in `0..=last_wave(round)` for the provided elapsed time.
    ///
    /// This is the lower-bound insertion index of `elapsed_ms` among the round's
    /// offsets, so a value equal to an offset maps to that offset's index. Unknown
    /// rounds and implausibly large elapsed times yield zero.
    #[must_use]
    pub fn current_wave(&self, table: &TimingTable, round: u32, elapsed_ms: u32) -> u32 {
        if elapsed_ms > self.config.max_elapsed_ms {
            return 0;
        }
        let elapsed = u64::from(elapsed_ms);
        let index = table
            .offsets(round)
            .partition_point(|offset| u64::from(*offset) * MILLIS_PER_SECOND < elapsed);
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// Reports whether `elapsed_ms` falls in the final wave of a known round.
    #[must_use]
    pub fn is_last_wave(&self, table: &TimingTable, round: u32, elapsed_ms: u32) -> bool {
        let last_wave = table.last_wave(round);
        last_wave > 0 && self.current_wave(table, round, elapsed_ms) == last_wave
    }
}
