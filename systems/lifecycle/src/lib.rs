#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round and wave lifecycle that decides when stats snapshots are taken.
//!
//! [`RoundLifecycle`] owns every piece of mutable tracking state. The host
//! forwards round titles to [`RoundLifecycle::on_round_start`] and calls
//! [`RoundLifecycle::on_tick`] once per client tick. Snapshots are never taken
//! directly on a title: a settle countdown runs first, and the snapshot taken when
//! it expires both closes the previous round's report and becomes the new
//! round's baseline.

use std::time::Instant;

use round_recap_core::{
    CaptureError, Event, LastWaveSkip, PendingReport, ResetReason, StatsSnapshot, TitleSignal,
};
use round_recap_system_report::ReportComposer;
use round_recap_system_timing::{ElapsedClock, TimingTable, WaveEstimator};

/// Ticks between a round title and the snapshot taken for it.
pub const DEFAULT_SETTLE_DELAY_TICKS: u32 = 25;
/// Consecutive ticks without the session banner before state is discarded.
pub const DEFAULT_PRESENCE_DEBOUNCE_TICKS: u32 = 10;
/// Tolerance before the predicted last-wave start.
pub const DEFAULT_LAST_WAVE_SLACK_MS: u32 = 2_000;

/// Configuration for the round lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    settle_delay_ticks: u32,
    presence_debounce_ticks: u32,
    last_wave_slack_ms: u32,
}

impl Config {
    /// Creates a new lifecycle configuration.
    ///
    /// A settle delay of zero is raised to one tick, since the round baseline is
    /// only captured when the countdown expires.
    #[must_use]
    pub const fn new(
        settle_delay_ticks: u32,
        presence_debounce_ticks: u32,
        last_wave_slack_ms: u32,
    ) -> Self {
        Self {
            settle_delay_ticks: if settle_delay_ticks == 0 {
                1
            } else {
                settle_delay_ticks
            },
            presence_debounce_ticks,
            last_wave_slack_ms,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SETTLE_DELAY_TICKS,
            DEFAULT_PRESENCE_DEBOUNCE_TICKS,
            DEFAULT_LAST_WAVE_SLACK_MS,
        )
    }
}

/// Tick-driven state machine tracking rounds, waves and the pending report.
#[derive(Debug)]
pub struct RoundLifecycle {
    config: Config,
    timing: TimingTable,
    estimator: WaveEstimator,
    clock: ElapsedClock,
    composer: ReportComposer,
    tracker_enabled: bool,
    debug_enabled: bool,
    current_round: u32,
    current_wave: u32,
    snapshot_delay_ticks: u32,
    title_missing_ticks: u32,
    round_start: StatsSnapshot,
    last_wave_start: StatsSnapshot,
    pending_report: Option<PendingReport>,
}

impl RoundLifecycle {
    /// Creates an idle lifecycle with tracking enabled and trace events disabled.
    #[must_use]
    pub fn new(config: Config, timing: TimingTable, estimator: WaveEstimator) -> Self {
        Self {
            config,
            timing,
            estimator,
            clock: ElapsedClock::new(),
            composer: ReportComposer::new(),
            tracker_enabled: true,
            debug_enabled: false,
            current_round: 0,
            current_wave: 0,
            snapshot_delay_ticks: 0,
            title_missing_ticks: 0,
            round_start: StatsSnapshot::new(),
            last_wave_start: StatsSnapshot::new(),
            pending_report: None,
        }
    }

    /// Replaces the timing table, e.g. once the map has been identified.
    pub fn set_timing_table(&mut self, timing: TimingTable) {
        self.timing = timing;
    }

    /// Enables or disables all lifecycle activity.
    pub fn set_tracker_enabled(&mut self, enabled: bool) {
        self.tracker_enabled = enabled;
    }

    /// Enables or disables trace events in the output buffer.
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug_enabled = enabled;
    }

    /// Whether the lifecycle reacts to signals.
    #[must_use]
    pub const fn tracker_enabled(&self) -> bool {
        self.tracker_enabled
    }

    /// Whether trace events are emitted.
    #[must_use]
    pub const fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Round currently tracked, zero when idle.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Last estimated wave of the current round.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Ticks left before the delayed snapshot, zero when none is armed.
    #[must_use]
    pub const fn snapshot_delay_ticks(&self) -> u32 {
        self.snapshot_delay_ticks
    }

    /// Consecutive ticks the session banner has been absent.
    #[must_use]
    pub const fn title_missing_ticks(&self) -> u32 {
        self.title_missing_ticks
    }

    /// Report awaiting its end snapshot.
    #[must_use]
    pub fn pending_report(&self) -> Option<&PendingReport> {
        self.pending_report.as_ref()
    }

    /// Baseline of the current round, empty until the settle delay has expired.
    #[must_use]
    pub fn round_start(&self) -> &StatsSnapshot {
        &self.round_start
    }

    /// Baseline taken when the current round's last wave began.
    #[must_use]
    pub fn last_wave_start(&self) -> &StatsSnapshot {
        &self.last_wave_start
    }

    /// Milliseconds since the current round's title.
    #[must_use]
    pub fn elapsed_ms(&self, now: Instant) -> u32 {
        self.clock.elapsed_ms(now)
    }

    /// Reacts to a round title or game-end banner.
    pub fn on_round_start(&mut self, signal: TitleSignal, now: Instant, out: &mut Vec<Event>) {
        if !self.tracker_enabled {
            return;
        }

        let new_round = signal.round();
        tracing::debug!(
            new_round,
            current_round = self.current_round,
            pending = self.pending_report.is_some(),
            "round title observed"
        );

        if new_round == 1 && self.current_round > 1 {
            self.reset(ResetReason::NewSession, out);
        }
        if self.current_round == 0 {
            self.reset(ResetReason::FreshStart, out);
        }

        if self.current_round > 0
            && new_round != self.current_round
            && self.pending_report.is_none()
        {
            let pending = PendingReport::new(
                self.current_round,
                self.round_start.clone(),
                self.last_wave_start.clone(),
            );
            self.trace(
                out,
                Event::PendingReportCreated {
                    round: pending.round(),
                },
            );
            self.pending_report = Some(pending);
        }

        self.current_round = new_round;
        self.current_wave = 0;
        self.last_wave_start.clear();
        self.snapshot_delay_ticks = self.config.settle_delay_ticks;
        self.trace(
            out,
            Event::SnapshotScheduled {
                round: new_round,
                delay_ticks: self.snapshot_delay_ticks,
            },
        );

        if new_round > 0 {
            self.clock.start(now);
        }
    }

    /// Advances the lifecycle by one client tick.
    ///
    /// `capture` is invoked whenever a snapshot is due and must read the current
    /// game surface. A failed capture is treated as an empty snapshot.
    pub fn on_tick<F>(&mut self, in_session: bool, now: Instant, mut capture: F, out: &mut Vec<Event>)
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        if !self.tracker_enabled {
            return;
        }

        if !in_session {
            self.title_missing_ticks = self.title_missing_ticks.saturating_add(1);
            if self.title_missing_ticks >= self.config.presence_debounce_ticks {
                let was_tracking = self.is_tracking();
                self.flush_on_exit(&mut capture, out);
                self.clear();
                self.clock.stop();
                if was_tracking {
                    self.announce_reset(ResetReason::LeftSession, out);
                }
            }
            return;
        }
        self.title_missing_ticks = 0;

        self.update_wave(now, &mut capture, out);

        if self.snapshot_delay_ticks > 0 {
            self.snapshot_delay_ticks -= 1;
            if self.snapshot_delay_ticks == 0 {
                self.take_delayed_snapshot(&mut capture, out);
            }
        }
    }

    fn update_wave<F>(&mut self, now: Instant, capture: &mut F, out: &mut Vec<Event>)
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        let round = self.current_round;
        let elapsed_ms = self.clock.elapsed_ms(now);
        let wave = self.estimator.current_wave(&self.timing, round, elapsed_ms);
        if wave == self.current_wave || wave == 0 {
            return;
        }

        let previous = self.current_wave;
        self.current_wave = wave;
        self.trace(out, Event::WaveChanged { round, wave });

        if previous >= wave || wave != self.timing.last_wave(round) {
            return;
        }

        // The too-early branch is never taken while the wave and `expected_ms` come from one table.
        let expected_ms = self.timing.last_wave_offset_ms(round).unwrap_or(0);
        if self.round_start.is_empty() {
            self.trace(
                out,
                Event::LastWaveSkipped {
                    round,
                    reason: LastWaveSkip::MissingBaseline,
                },
            );
        } else if elapsed_ms < expected_ms.saturating_sub(self.config.last_wave_slack_ms) {
            self.trace(
                out,
                Event::LastWaveSkipped {
                    round,
                    reason: LastWaveSkip::TooEarly {
                        elapsed_ms,
                        expected_ms,
                    },
                },
            );
        } else {
            self.last_wave_start = self.capture_or_empty(capture, out);
            tracing::debug!(round, wave, elapsed_ms, "last wave baseline captured");
            self.trace(
                out,
                Event::LastWaveCaptured {
                    round,
                    players: self.last_wave_start.len(),
                },
            );
        }
    }

    fn take_delayed_snapshot<F>(&mut self, capture: &mut F, out: &mut Vec<Event>)
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        let snapshot = self.capture_or_empty(capture, out);
        if let Some(pending) = self.pending_report.take() {
            self.finalize(&pending, &snapshot, out);
        }

        tracing::debug!(
            round = self.current_round,
            players = snapshot.len(),
            "round baseline captured"
        );
        self.trace(
            out,
            Event::BaselineCaptured {
                round: self.current_round,
                players: snapshot.len(),
            },
        );
        self.round_start = snapshot;
    }

    fn flush_on_exit<F>(&mut self, capture: &mut F, out: &mut Vec<Event>)
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        if let Err(error) = self.try_flush(capture, out) {
            tracing::debug!(%error, round = self.current_round, "end-of-session flush abandoned");
            self.trace(
                out,
                Event::CaptureFailed {
                    round: self.current_round,
                    reason: error.to_string(),
                },
            );
        }
    }

    fn try_flush<F>(&mut self, capture: &mut F, out: &mut Vec<Event>) -> Result<(), CaptureError>
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        if self.current_round == 0 || self.round_start.is_empty() {
            return Ok(());
        }

        let end = capture()?;
        if end.is_empty() {
            return Ok(());
        }

        let pending = self.pending_report.take().unwrap_or_else(|| {
            PendingReport::new(
                self.current_round,
                self.round_start.clone(),
                self.last_wave_start.clone(),
            )
        });
        self.finalize(&pending, &end, out);
        Ok(())
    }

    fn finalize(&self, pending: &PendingReport, end: &StatsSnapshot, out: &mut Vec<Event>) {
        if let Some(reason) = self.composer.skip_reason(pending, end) {
            tracing::debug!(round = pending.round(), ?reason, "report skipped");
            self.trace(
                out,
                Event::ReportSkipped {
                    round: pending.round(),
                    reason,
                },
            );
            return;
        }

        if let Some(report) = self.composer.compose(pending, end) {
            tracing::info!(
                round = report.round(),
                players = report.rows().len(),
                "round report ready"
            );
            out.push(Event::ReportReady { report });
        }
    }

    fn capture_or_empty<F>(&self, capture: &mut F, out: &mut Vec<Event>) -> StatsSnapshot
    where
        F: FnMut() -> Result<StatsSnapshot, CaptureError>,
    {
        match capture() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, round = self.current_round, "stats capture failed");
                self.trace(
                    out,
                    Event::CaptureFailed {
                        round: self.current_round,
                        reason: error.to_string(),
                    },
                );
                StatsSnapshot::new()
            }
        }
    }

    fn is_tracking(&self) -> bool {
        self.current_round != 0 || self.snapshot_delay_ticks != 0 || self.pending_report.is_some()
    }

    fn reset(&mut self, reason: ResetReason, out: &mut Vec<Event>) {
        self.clear();
        self.announce_reset(reason, out);
    }

    fn announce_reset(&self, reason: ResetReason, out: &mut Vec<Event>) {
        tracing::info!(?reason, "round tracking reset");
        self.trace(out, Event::SessionReset { reason });
    }

    fn clear(&mut self) {
        self.round_start.clear();
        self.last_wave_start.clear();
        self.current_round = 0;
        self.current_wave = 0;
        self.snapshot_delay_ticks = 0;
        self.title_missing_ticks = 0;
        self.pending_report = None;
    }

    fn trace(&self, out: &mut Vec<Event>, event: Event) {
        if self.debug_enabled {
            out.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use round_recap_core::PlayerStats;

    use super::*;

    fn lifecycle() -> RoundLifecycle {
        let timing = TimingTable::new(vec![vec![10, 20], vec![10, 20, 30]]).expect("valid table");
        RoundLifecycle::new(Config::default(), timing, WaveEstimator::default())
    }

    fn one_player() -> Result<StatsSnapshot, CaptureError> {
        let mut snapshot = StatsSnapshot::new();
        snapshot.insert("Alice", PlayerStats::new(1, 10));
        Ok(snapshot)
    }

    #[test]
    fn disabled_tracker_ignores_signals() {
        let mut lifecycle = lifecycle();
        lifecycle.set_tracker_enabled(false);
        let mut out = Vec::new();
        let now = Instant::now();

        lifecycle.on_round_start(TitleSignal::Round(1), now, &mut out);
        lifecycle.on_tick(true, now, one_player, &mut out);

        assert_eq!(lifecycle.current_round(), 0);
        assert_eq!(lifecycle.snapshot_delay_ticks(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn trace_events_require_debug() {
        let now = Instant::now();

        let mut quiet = lifecycle();
        let mut out = Vec::new();
        quiet.on_round_start(TitleSignal::Round(1), now, &mut out);
        assert!(out.is_empty());

        let mut verbose = lifecycle();
        verbose.set_debug_enabled(true);
        verbose.on_round_start(TitleSignal::Round(1), now, &mut out);
        assert_eq!(
            out,
            vec![
                Event::SessionReset {
                    reason: ResetReason::FreshStart
                },
                Event::SnapshotScheduled {
                    round: 1,
                    delay_ticks: DEFAULT_SETTLE_DELAY_TICKS
                },
            ]
        );
    }

    #[test]
    fn zero_settle_delay_still_captures_baseline_and_reports() {
        let timing = TimingTable::new(vec![vec![10, 20], vec![10, 20, 30]]).expect("valid table");
        let mut lifecycle = RoundLifecycle::new(Config::new(0, 10, 2_000), timing, WaveEstimator::default());
        let mut out = Vec::new();
        let now = Instant::now();

        lifecycle.on_round_start(TitleSignal::Round(1), now, &mut out);
        assert_eq!(lifecycle.snapshot_delay_ticks(), 1);
        for _ in 0..100 {
            lifecycle.on_tick(true, now, one_player, &mut out);
        }
        assert!(!lifecycle.round_start().is_empty());

        lifecycle.on_round_start(TitleSignal::Round(2), now, &mut out);
        for _ in 0..100 {
            lifecycle.on_tick(true, now, one_player, &mut out);
        }

        assert!(lifecycle.pending_report().is_none());
        let reports = out
            .iter()
            .filter(|event| matches!(event, Event::ReportReady { .. }))
            .count();
        assert_eq!(reports, 1);
    }

    #[test]
    fn failed_delayed_capture_installs_empty_baseline() {
        let mut lifecycle = lifecycle();
        let mut out = Vec::new();
        let now = Instant::now();
        lifecycle.on_round_start(TitleSignal::Round(1), now, &mut out);

        for _ in 0..DEFAULT_SETTLE_DELAY_TICKS {
            lifecycle.on_tick(true, now, || Err(CaptureError::SidebarMissing), &mut out);
        }

        assert!(lifecycle.round_start().is_empty());
        assert_eq!(lifecycle.snapshot_delay_ticks(), 0);
    }
}
