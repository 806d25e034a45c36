#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the round recap pipeline.
//!
//! This crate defines the message surface that connects adapters, the observed
//! game surface, and pure systems. Adapters submit [`Command`] values describing
//! what the game client currently shows, the world records them via its `apply`
//! entry point and broadcasts [`Event`] values. Systems read stat snapshots,
//! track the round lifecycle, and respond with further events, the most
//! important being [`Event::ReportReady`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible mutations of the observed game surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the title shown above the scoreboard sidebar.
    SetSidebarTitle {
        /// Raw title text including formatting codes.
        title: String,
    },
    /// Replaces the ordered text rows rendered in the scoreboard sidebar.
    SetSidebarLines {
        /// Raw sidebar rows from top to bottom.
        lines: Vec<String>,
    },
    /// Replaces the entries shown in the player list.
    SetPlayerList {
        /// Entries in the order the client reports them.
        entries: Vec<PlayerListEntry>,
    },
    /// Removes the sidebar entirely, as happens between minigames.
    ClearSidebar,
}

/// Events broadcast by the world and the systems reacting to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the sidebar contents changed.
    SidebarUpdated {
        /// Number of rows currently rendered in the sidebar.
        line_count: usize,
    },
    /// Confirms that the player list changed.
    PlayerListUpdated {
        /// Number of entries currently in the player list.
        entry_count: usize,
    },
    /// Announces that the minigame session banner appeared or disappeared.
    SessionPresenceChanged {
        /// Whether the session banner is visible after the change.
        in_session: bool,
    },
    /// Reports that the round lifecycle discarded all tracked state.
    SessionReset {
        /// Trigger that caused the reset.
        reason: ResetReason,
    },
    /// Reports that the outgoing round was frozen awaiting its end snapshot.
    PendingReportCreated {
        /// Round the pending report describes.
        round: u32,
    },
    /// Reports that a delayed snapshot was armed for a newly started round.
    SnapshotScheduled {
        /// Round whose baseline will be captured.
        round: u32,
        /// Ticks remaining before the capture happens.
        delay_ticks: u32,
    },
    /// Reports that the estimated wave index changed.
    WaveChanged {
        /// Round the wave belongs to.
        round: u32,
        /// Newly estimated wave index.
        wave: u32,
    },
    /// Reports that the last-wave baseline was captured.
    LastWaveCaptured {
        /// Round whose last wave started.
        round: u32,
        /// Number of players in the captured snapshot.
        players: usize,
    },
    /// Reports that the last wave was entered but no baseline was taken.
    LastWaveSkipped {
        /// Round whose last wave started.
        round: u32,
        /// Why the capture did not happen.
        reason: LastWaveSkip,
    },
    /// Reports that the delayed baseline snapshot for a round was installed.
    BaselineCaptured {
        /// Round the baseline belongs to.
        round: u32,
        /// Number of players in the captured snapshot.
        players: usize,
    },
    /// Reports that a report could not be composed.
    ReportSkipped {
        /// Round the report would have described.
        round: u32,
        /// Which snapshot was missing.
        reason: ReportSkip,
    },
    /// Reports that the stats source failed while capturing a snapshot.
    CaptureFailed {
        /// Round being tracked when the failure occurred.
        round: u32,
        /// Human readable failure description.
        reason: String,
    },
    /// Publishes a finalized round report.
    ReportReady {
        /// The composed report.
        report: RoundReport,
    },
}

/// Trigger that caused the round lifecycle to discard its state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResetReason {
    /// Round one was observed after a later round, proving a new session.
    NewSession,
    /// A round started while no round was being tracked.
    FreshStart,
    /// The session banner stayed absent past the debounce window.
    LeftSession,
}

/// Reason a last-wave baseline was not captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LastWaveSkip {
    /// The round baseline has not been captured yet.
    MissingBaseline,
    /// Elapsed time is still short of the predicted last-wave start.
    TooEarly {
        /// Milliseconds elapsed since the round started.
        elapsed_ms: u32,
        /// Milliseconds at which the table predicts the last wave.
        expected_ms: u32,
    },
}

/// Reason a report was not composed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportSkip {
    /// The round baseline snapshot was empty.
    EmptyBaseline,
    /// The end snapshot was empty.
    EmptyEnd,
}

/// Round title signal detected by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleSignal {
    /// A round with the provided number started.
    Round(u32),
    /// The game ended through a win or loss banner.
    GameEnded,
}

impl TitleSignal {
    /// Interprets a raw round number, where zero denotes the end of the game.
    #[must_use]
    pub const fn from_round(round: u32) -> Self {
        if round == 0 {
            Self::GameEnded
        } else {
            Self::Round(round)
        }
    }

    /// Numeric round carried by the signal, zero for the end of the game.
    #[must_use]
    pub const fn round(&self) -> u32 {
        match self {
            Self::Round(round) => *round,
            Self::GameEnded => 0,
        }
    }
}

/// Kills and gold recorded for one player at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    kills: u32,
    gold: u32,
}

impl PlayerStats {
    /// Creates a new stats value.
    #[must_use]
    pub const fn new(kills: u32, gold: u32) -> Self {
        Self { kills, gold }
    }

    /// Kill count shown in the player list.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Gold shown in the scoreboard sidebar.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }
}

/// Mapping from canonical player identity to stats captured at one instant.
///
/// Entries are kept sorted by identity so iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    players: BTreeMap<String, PlayerStats>,
}

impl StatsSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stats for the provided player, replacing any previous entry.
    pub fn insert(&mut self, player: impl Into<String>, stats: PlayerStats) {
        let _ = self.players.insert(player.into(), stats);
    }

    /// Stats recorded for the provided player, if any.
    #[must_use]
    pub fn get(&self, player: &str) -> Option<PlayerStats> {
        self.players.get(player).copied()
    }

    /// Reports whether the snapshot contains no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of players in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Iterates over players in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PlayerStats)> + '_ {
        self.players
            .iter()
            .map(|(player, stats)| (player.as_str(), *stats))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.players.clear();
    }
}

impl FromIterator<(String, PlayerStats)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, PlayerStats)>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}

/// Frozen state of a round that ended and awaits its end snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReport {
    round: u32,
    round_start: StatsSnapshot,
    last_wave_start: StatsSnapshot,
}

impl PendingReport {
    /// Freezes the provided snapshots for a round.
    #[must_use]
    pub fn new(round: u32, round_start: StatsSnapshot, last_wave_start: StatsSnapshot) -> Self {
        Self {
            round,
            round_start,
            last_wave_start,
        }
    }

    /// Round the report describes.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Snapshot captured after the round's settle delay.
    #[must_use]
    pub fn round_start(&self) -> &StatsSnapshot {
        &self.round_start
    }

    /// Snapshot captured when the round's last wave began, possibly empty.
    #[must_use]
    pub fn last_wave_start(&self) -> &StatsSnapshot {
        &self.last_wave_start
    }
}

/// Signed change in kills and gold between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsDelta {
    kills: i64,
    gold: i64,
}

impl StatsDelta {
    /// Creates a delta from explicit components.
    #[must_use]
    pub const fn new(kills: i64, gold: i64) -> Self {
        Self { kills, gold }
    }

    /// Computes `end - start` for both components.
    #[must_use]
    pub const fn between(start: PlayerStats, end: PlayerStats) -> Self {
        Self {
            kills: end.kills as i64 - start.kills as i64,
            gold: end.gold as i64 - start.gold as i64,
        }
    }

    /// Change in kills.
    #[must_use]
    pub const fn kills(&self) -> i64 {
        self.kills
    }

    /// Change in gold.
    #[must_use]
    pub const fn gold(&self) -> i64 {
        self.gold
    }
}

/// Per-player row of a round report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDelta {
    player: String,
    round: StatsDelta,
    last_wave: Option<StatsDelta>,
}

impl PlayerDelta {
    /// Creates a report row.
    #[must_use]
    pub fn new(player: impl Into<String>, round: StatsDelta, last_wave: Option<StatsDelta>) -> Self {
        Self {
            player: player.into(),
            round,
            last_wave,
        }
    }

    /// Canonical player identity.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Change over the whole round.
    #[must_use]
    pub const fn round(&self) -> StatsDelta {
        self.round
    }

    /// Change since the last wave began, when a last-wave baseline exists for the player.
    #[must_use]
    pub const fn last_wave(&self) -> Option<StatsDelta> {
        self.last_wave
    }
}

/// Finalized summary for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    round: u32,
    rows: Vec<PlayerDelta>,
    text: String,
}

impl RoundReport {
    /// Creates a report from sorted rows and their rendered text.
    #[must_use]
    pub fn new(round: u32, rows: Vec<PlayerDelta>, text: String) -> Self {
        Self { round, rows, text }
    }

    /// Round the report describes.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Rows sorted by descending round kills.
    #[must_use]
    pub fn rows(&self) -> &[PlayerDelta] {
        &self.rows
    }

    /// Multi-line text block handed to the message sink.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Raw entry reported by the client's player list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerListEntry {
    name: String,
    objective_score: Option<i32>,
    display_text: Option<String>,
}

impl PlayerListEntry {
    /// Creates an entry for the provided canonical name.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        objective_score: Option<i32>,
        display_text: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            objective_score,
            display_text,
        }
    }

    /// Canonical account name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Score from the player list's numeric objective, when one is displayed.
    #[must_use]
    pub const fn objective_score(&self) -> Option<i32> {
        self.objective_score
    }

    /// Rendered entry text including formatting codes, when the client provides one.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.display_text.as_deref()
    }
}

/// Failure raised when stats cannot be captured from the game surface.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The scoreboard sidebar is not displayed.
    #[error("scoreboard sidebar is not displayed")]
    SidebarMissing,
    /// The player list has no entries.
    #[error("player list is empty")]
    PlayerListEmpty,
}

/// Helpers for the client's formatting-code text encoding.
pub mod text {
    /// Character introducing a two-character formatting code.
    pub const FORMATTING_PREFIX: char = '§';

    /// Removes every formatting code, i.e. the prefix and the character following it.
    #[must_use]
    pub fn strip_formatting(input: &str) -> String {
        let mut stripped = String::with_capacity(input.len());
        let mut chars = input.chars();
        while let Some(ch) = chars.next() {
            if ch == FORMATTING_PREFIX {
                let _ = chars.next();
            } else {
                stripped.push(ch);
            }
        }
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let mut snapshot = StatsSnapshot::new();
        snapshot.insert("Alice", PlayerStats::new(4, 250));
        snapshot.insert("Bob", PlayerStats::new(0, 0));
        assert_round_trip(&snapshot);
    }

    #[test]
    fn report_ready_event_round_trips_through_bincode() {
        let rows = vec![PlayerDelta::new(
            "Alice",
            StatsDelta::new(3, 240),
            Some(StatsDelta::new(1, 40)),
        )];
        let event = Event::ReportReady {
            report: RoundReport::new(4, rows, "Alice: 3/240  |  1/40".to_owned()),
        };
        assert_round_trip(&event);
    }

    #[test]
    fn snapshot_stores_copies() {
        let mut live = PlayerStats::new(2, 100);
        let mut snapshot = StatsSnapshot::new();
        snapshot.insert("Alice", live);
        live = PlayerStats::new(5, 340);

        assert_eq!(snapshot.get("Alice"), Some(PlayerStats::new(2, 100)));
        assert_ne!(snapshot.get("Alice"), Some(live));
    }

    #[test]
    fn snapshot_iterates_in_identity_order() {
        let snapshot: StatsSnapshot = [
            ("carol".to_owned(), PlayerStats::new(1, 1)),
            ("Alice".to_owned(), PlayerStats::new(2, 2)),
            ("bob".to_owned(), PlayerStats::new(3, 3)),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Alice", "bob", "carol"]);
    }

    #[test]
    fn delta_is_end_minus_start() {
        let delta = StatsDelta::between(PlayerStats::new(2, 100), PlayerStats::new(5, 340));
        assert_eq!(delta, StatsDelta::new(3, 240));

        let negative = StatsDelta::between(PlayerStats::new(5, 340), PlayerStats::new(2, 100));
        assert_eq!(negative, StatsDelta::new(-3, -240));
    }

    #[test]
    fn title_signal_maps_zero_to_game_end() {
        assert_eq!(TitleSignal::from_round(0), TitleSignal::GameEnded);
        assert_eq!(TitleSignal::from_round(7), TitleSignal::Round(7));
        assert_eq!(TitleSignal::GameEnded.round(), 0);
    }

    #[test]
    fn strips_formatting_codes() {
        assert_eq!(text::strip_formatting("§7[MVP§c+§7] Alice"), "[MVP+] Alice");
        assert_eq!(text::strip_formatting("§eZOMBIES"), "ZOMBIES");
        assert_eq!(text::strip_formatting("trailing§"), "trailing");
        assert_eq!(text::strip_formatting("plain"), "plain");
    }
}
