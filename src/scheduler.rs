//! Trigger arbitration.
//!
//! Two event sources compete for the single device output every tick:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Trigger Sources                          │
//! │                                                              │
//! │      ┌──────────────────┐          ┌──────────────────┐      │
//! │      │ Operator key '0' │          │ Cycle deadline   │      │
//! │      │ (non-blocking)   │          │ last + period    │      │
//! │      └────────┬─────────┘          └────────┬─────────┘      │
//! │               │  wins ties                  │                │
//! │               ▼                             ▼                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                 Scheduler::decide()                    │  │
//! │  │        at most one Trigger per tick, or None           │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          │                                   │
//! │                          ▼                                   │
//! │                 OverrideLoop::fire()                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler holds no mutable state of its own.  The deadline is
//! re-derived from [`RunClock::last_mark`] on every call, so a manual
//! override re-anchors the schedule simply by moving that mark.  Elapsed
//! time is measured on the clock's monotonic reading; the wall clock is only
//! used to tell the operator when the next transition is due.

use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use log::debug;

use crate::app::commands::OperatorCommand;
use crate::config::ScheduleConfig;
use crate::fsm::Trigger;
use crate::fsm::context::RunClock;

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
    max_cycles: u32,
    override_key: u8,
}

impl Scheduler {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            period: config.command_cycle_period,
            max_cycles: config.max_cycles,
            override_key: config.override_key,
        }
    }

    /// Decide whether a transition fires this tick.
    ///
    /// * `key` — the key polled this tick, if any.  The override key wins
    ///   even when the deadline has also passed; exactly one trigger comes
    ///   back either way.  Any other key uses up the tick, and an elapsed
    ///   deadline fires on the next one.
    /// * `elapsed` — the clock's monotonic reading.
    pub fn decide(&self, key: Option<u8>, elapsed: Duration, clock: &RunClock) -> Option<Trigger> {
        if let Some(k) = key {
            if OperatorCommand::from_key(k, self.override_key).is_some() {
                return Some(Trigger::Manual);
            }
            debug!("Scheduler: ignoring key 0x{:02x}", k);
            return None;
        }
        if self.is_due(elapsed, clock) {
            return Some(Trigger::Automatic);
        }
        None
    }

    /// `true` once the command cycle period has elapsed since the last transition.
    pub fn is_due(&self, elapsed: Duration, clock: &RunClock) -> bool {
        elapsed.saturating_sub(clock.last_mark) >= self.period
    }

    /// Wall-clock time of the next automatic transition absent any override.
    /// `None` if the period is too large to represent.
    pub fn next_deadline(&self, clock: &RunClock) -> Option<DateTime<Local>> {
        let period = TimeDelta::from_std(self.period).ok()?;
        clock.last_transition.checked_add_signed(period)
    }

    /// `true` once the configured number of automatic cycles has fired.
    pub fn is_complete(&self, clock: &RunClock) -> bool {
        clock.cycle_count >= self.max_cycles
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
