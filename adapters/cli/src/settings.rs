//! Optional TOML settings controlling the recap pipeline.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use round_recap_system_lifecycle as lifecycle;
use round_recap_system_reconciler::{self as reconciler, MatchThresholds};
use round_recap_system_timing::{self as timing, MapKind, TimingTable, WaveEstimator};
use serde::Deserialize;

/// Settings loaded from `--config`, every field optional.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) tracker_enabled: bool,
    pub(crate) debug_enabled: bool,
    pub(crate) chat_messages_enabled: bool,
    map: Option<MapKind>,
    rounds: Option<Vec<Vec<u32>>>,
    session_markers: Option<Vec<String>>,
    lifecycle: LifecycleSettings,
    timing: TimingSettings,
    reconciler: ReconcilerSettings,
    matching: MatchingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracker_enabled: true,
            debug_enabled: false,
            chat_messages_enabled: true,
            map: None,
            rounds: None,
            session_markers: None,
            lifecycle: LifecycleSettings::default(),
            timing: TimingSettings::default(),
            reconciler: ReconcilerSettings::default(),
            matching: MatchingSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LifecycleSettings {
    settle_delay_ticks: u32,
    presence_debounce_ticks: u32,
    last_wave_slack_ms: u32,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            settle_delay_ticks: lifecycle::DEFAULT_SETTLE_DELAY_TICKS,
            presence_debounce_ticks: lifecycle::DEFAULT_PRESENCE_DEBOUNCE_TICKS,
            last_wave_slack_ms: lifecycle::DEFAULT_LAST_WAVE_SLACK_MS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimingSettings {
    max_elapsed_ms: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            max_elapsed_ms: timing::DEFAULT_MAX_ELAPSED_MS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ReconcilerSettings {
    sidebar_header_rows: usize,
    min_name_len: usize,
    max_name_len: usize,
    reserved_prefix: char,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            sidebar_header_rows: reconciler::DEFAULT_SIDEBAR_HEADER_ROWS,
            min_name_len: *reconciler::DEFAULT_NAME_LEN.start(),
            max_name_len: *reconciler::DEFAULT_NAME_LEN.end(),
            reserved_prefix: reconciler::DEFAULT_RESERVED_PREFIX,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MatchingSettings {
    long_name_len: usize,
    short_name_min_len: usize,
    short_name_slack: usize,
    suffix_len: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        let thresholds = MatchThresholds::default();
        Self {
            long_name_len: thresholds.long_name_len(),
            short_name_min_len: thresholds.short_name_min_len(),
            short_name_slack: thresholds.short_name_slack(),
            suffix_len: thresholds.suffix_len(),
        }
    }
}

impl Settings {
    /// Reads and validates settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        if settings.reconciler.min_name_len > settings.reconciler.max_name_len {
            bail!(
                "reconciler.min_name_len {} exceeds reconciler.max_name_len {}",
                settings.reconciler.min_name_len,
                settings.reconciler.max_name_len
            );
        }
        if settings.lifecycle.settle_delay_ticks == 0 {
            bail!("lifecycle.settle_delay_ticks must be at least 1");
        }
        if settings.lifecycle.presence_debounce_ticks == 0 {
            bail!("lifecycle.presence_debounce_ticks must be at least 1");
        }
        Ok(settings)
    }

    /// Resolves the timing table: custom rounds win, then `map`, then the configured map.
    pub(crate) fn timing_table(&self, map: Option<MapKind>) -> Result<TimingTable> {
        if let Some(rounds) = &self.rounds {
            return TimingTable::new(rounds.clone()).context("invalid custom round timings");
        }
        Ok(map
            .or(self.map)
            .map_or_else(TimingTable::empty, MapKind::timing_table))
    }

    /// Session markers overriding the defaults, if configured.
    pub(crate) fn session_markers(&self) -> Option<&[String]> {
        self.session_markers.as_deref()
    }

    pub(crate) fn lifecycle(&self) -> lifecycle::Config {
        lifecycle::Config::new(
            self.lifecycle.settle_delay_ticks,
            self.lifecycle.presence_debounce_ticks,
            self.lifecycle.last_wave_slack_ms,
        )
    }

    pub(crate) fn estimator(&self) -> WaveEstimator {
        WaveEstimator::new(timing::Config::new(self.timing.max_elapsed_ms))
    }

    pub(crate) fn reconciler(&self) -> reconciler::Config {
        reconciler::Config::new(
            self.reconciler.sidebar_header_rows,
            self.reconciler.min_name_len..=self.reconciler.max_name_len,
            self.reconciler.reserved_prefix,
            MatchThresholds::new(
                self.matching.long_name_len,
                self.matching.short_name_min_len,
                self.matching.short_name_slack,
                self.matching.suffix_len,
            ),
        )
    }
}
