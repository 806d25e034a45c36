//! Drives the world, reconciler and lifecycle through a recorded session.

use std::time::{Duration, Instant};

use round_recap_core::{CaptureError, Event, StatsSnapshot};
use round_recap_system_lifecycle::RoundLifecycle;
use round_recap_system_reconciler::StatsReconciler;
use round_recap_world::{self as world, query, World};

use crate::script::Frame;

/// Replay state advancing on a virtual clock.
#[derive(Debug)]
pub(crate) struct Replay {
    world: World,
    reconciler: StatsReconciler,
    lifecycle: RoundLifecycle,
    tick: Duration,
    now: Instant,
    chat_messages_enabled: bool,
}

impl Replay {
    pub(crate) fn new(
        world: World,
        reconciler: StatsReconciler,
        lifecycle: RoundLifecycle,
        tick: Duration,
        chat_messages_enabled: bool,
    ) -> Self {
        Self {
            world,
            reconciler,
            lifecycle,
            tick,
            now: Instant::now(),
            chat_messages_enabled,
        }
    }

    /// Whether finished reports are delivered to the player.
    pub(crate) fn chat_messages_enabled(&self) -> bool {
        self.chat_messages_enabled
    }

    /// Applies one frame and collects the lifecycle events it produced.
    pub(crate) fn run_frame(&mut self, frame: &Frame, out: &mut Vec<Event>) {
        if let Some(enabled) = frame.tracker_enabled {
            self.lifecycle.set_tracker_enabled(enabled);
        }
        if let Some(enabled) = frame.debug_enabled {
            self.lifecycle.set_debug_enabled(enabled);
        }
        if let Some(enabled) = frame.chat_messages_enabled {
            self.chat_messages_enabled = enabled;
        }

        let mut world_events = Vec::new();
        for command in frame.commands() {
            world::apply(&mut self.world, command, &mut world_events);
        }
        for event in &world_events {
            tracing::trace!(?event, "world updated");
        }

        if let Some(signal) = frame.title_signal() {
            self.lifecycle.on_round_start(signal, self.now, out);
        }

        for _ in 0..frame.ticks {
            self.now += self.tick;
            let world = &self.world;
            let reconciler = &self.reconciler;
            self.lifecycle.on_tick(
                query::in_session(world),
                self.now,
                || capture(world, reconciler),
                out,
            );
        }
    }
}

fn capture(world: &World, reconciler: &StatsReconciler) -> Result<StatsSnapshot, CaptureError> {
    if query::sidebar(world).is_none() {
        return Err(CaptureError::SidebarMissing);
    }
    let entries = query::player_list(world);
    if entries.is_empty() {
        return Err(CaptureError::PlayerListEmpty);
    }
    Ok(reconciler.capture(query::sidebar_lines(world), entries))
}
