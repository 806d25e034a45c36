#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a recorded session through the round recap.

mod replay;
mod script;
mod settings;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use round_recap_core::Event;
use round_recap_system_lifecycle::RoundLifecycle;
use round_recap_system_reconciler::StatsReconciler;
use round_recap_system_timing::MapKind;
use round_recap_world::World;
use tracing_subscriber::EnvFilter;

use replay::Replay;
use script::Script;
use settings::Settings;

/// How lifecycle output is written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Round reports as chat text; trace events go to the log.
    Text,
    /// Every emitted event as one JSON object per line.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "round-recap",
    about = "Replay a recorded session and print per-round kill and gold recaps",
    version
)]
struct Args {
    /// Replay script describing the observed session.
    script: PathBuf,

    /// Settings file overriding the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in map timing table, taking precedence over the script and settings.
    #[arg(short, long)]
    map: Option<MapKind>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Emit lifecycle trace events and debug logs.
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

/// Entry point for the round recap command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let debug = args.debug || settings.debug_enabled;
    init_logging(debug);

    let script = Script::load(&args.script)?;
    let timing = settings.timing_table(args.map.or(script.map))?;
    tracing::info!(
        script = %args.script.display(),
        frames = script.frames.len(),
        rounds = timing.max_round(),
        "replaying session"
    );

    let world = match settings.session_markers() {
        Some(markers) => World::with_session_markers(markers.iter().cloned()),
        None => World::new(),
    };
    let mut lifecycle = RoundLifecycle::new(settings.lifecycle(), timing, settings.estimator());
    lifecycle.set_tracker_enabled(settings.tracker_enabled);
    lifecycle.set_debug_enabled(debug);

    let mut replay = Replay::new(
        world,
        StatsReconciler::new(settings.reconciler()),
        lifecycle,
        Duration::from_millis(script.tick_ms),
        settings.chat_messages_enabled,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut events = Vec::new();
    for frame in &script.frames {
        replay.run_frame(frame, &mut events);
        for event in events.drain(..) {
            emit(&mut out, args.format, &event, replay.chat_messages_enabled())?;
        }
    }
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn emit(out: &mut impl Write, format: OutputFormat, event: &Event, chat: bool) -> Result<()> {
    match (event, format) {
        (Event::ReportReady { report }, _) if !chat => {
            tracing::debug!(round = report.round(), "chat messages disabled, report suppressed");
        }
        (Event::ReportReady { report }, OutputFormat::Text) => {
            writeln!(out, "Round {}", report.round())?;
            writeln!(out, "{}", report.text())?;
        }
        (_, OutputFormat::Json) => {
            serde_json::to_writer(&mut *out, event).context("failed to encode event")?;
            writeln!(out)?;
        }
        (_, OutputFormat::Text) => {
            tracing::debug!(?event, "lifecycle trace");
        }
    }
    Ok(())
}
