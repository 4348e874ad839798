//! Mutable run state owned by the override loop.
//!
//! `RunContext` replaces the module-level toggle, timestamp and counter of a
//! script-style controller.  It is threaded by `&mut` into the transition
//! routine; nothing else holds a reference to it.

use std::time::Duration;

use chrono::{DateTime, Local};

use super::{DeviceState, RunPhase, Trigger};

// ---------------------------------------------------------------------------
// RunClock
// ---------------------------------------------------------------------------

/// Timing bookkeeping for the schedule.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    /// Civil timestamp of the last fired transition, as recorded in the table.
    pub last_transition: DateTime<Local>,
    /// Monotonic reading at the last fired transition.  The next automatic
    /// deadline is always re-derived from this value.
    pub last_mark: Duration,
    /// Automatic transitions fired so far.  Manual overrides never move it.
    pub cycle_count: u32,
}

impl RunClock {
    pub fn new(anchor: DateTime<Local>, mark: Duration) -> Self {
        Self {
            last_transition: anchor,
            last_mark: mark,
            cycle_count: 0,
        }
    }

    /// Record a fired transition.
    pub fn mark(&mut self, at: DateTime<Local>, mark: Duration, trigger: Trigger) {
        self.last_transition = at;
        self.last_mark = mark;
        if trigger.counts_as_cycle() {
            self.cycle_count += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// RunContext
// ---------------------------------------------------------------------------

/// Everything that changes while a run is in progress.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Host-side belief about the device output.
    pub state: DeviceState,
    pub clock: RunClock,
    pub phase: RunPhase,
    /// Manual overrides fired so far (informational).
    pub manual_count: u32,
}

impl RunContext {
    /// Fresh context: device assumed Off, schedule anchored at `anchor`.
    pub fn new(anchor: DateTime<Local>, mark: Duration) -> Self {
        Self {
            state: DeviceState::Off,
            clock: RunClock::new(anchor, mark),
            phase: RunPhase::Pending,
            manual_count: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }
}
