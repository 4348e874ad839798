//! Override loop — the hexagonal core.
//!
//! [`OverrideLoop`] owns the run context, the transition table and every
//! port.  It is the single writer of device state and of the table: nothing
//! outside this type can send a command or append a row.
//!
//! ```text
//!   OperatorInput ──▶ ┌─────────────────────────┐ ──▶ DeviceChannel
//!                     │      OverrideLoop       │
//!           Clock  ◀─▶│ Scheduler · RunContext  │ ──▶ Persister
//!                     │     TransitionLog       │ ──▶ EventSink
//!                     └─────────────────────────┘
//! ```
//!
//! A run is: one kickoff transition, a poll loop until the automatic cycle
//! limit is reached, then one synthetic sentinel row.

use chrono::{DateTime, Local, TimeDelta};
use log::{debug, info};

use crate::config::ScheduleConfig;
use crate::error::Result;
use crate::fsm::context::RunContext;
use crate::fsm::{DeviceState, RunPhase, Trigger};
use crate::scheduler::Scheduler;
use crate::transition_log::{Transition, TransitionLog};

use super::events::AppEvent;
use super::ports::{Clock, DeviceChannel, EventSink, OperatorInput, Persister};

/// State the trailing sentinel row is always labelled with.  Downstream
/// processing keys on this literal, not on the device's real final state.
pub const SENTINEL_STATE: DeviceState = DeviceState::On;

// ───────────────────────────────────────────────────────────────
// OverrideLoop
// ───────────────────────────────────────────────────────────────

pub struct OverrideLoop<D, I, P, C> {
    device: D,
    input: I,
    persister: P,
    clock: C,
    schedule: ScheduleConfig,
    scheduler: Scheduler,
    ctx: RunContext,
    log: TransitionLog,
}

impl<D, I, P, C> OverrideLoop<D, I, P, C>
where
    D: DeviceChannel,
    I: OperatorInput,
    P: Persister,
    C: Clock,
{
    /// Assemble a loop.  Nothing is sent until [`run`](Self::run) or
    /// [`start`](Self::start) is called.
    pub fn new(schedule: ScheduleConfig, device: D, input: I, persister: P, clock: C) -> Self {
        let anchor = clock.now();
        let mark = clock.monotonic();
        Self {
            device,
            input,
            persister,
            clock,
            scheduler: Scheduler::new(&schedule),
            schedule,
            ctx: RunContext::new(anchor, mark),
            log: TransitionLog::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive a complete run: kickoff, poll until the cycle limit, sentinel.
    ///
    /// Any port failure aborts immediately.  Whatever was persisted by the
    /// last successful transition stays on disk.
    pub fn run(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.start(sink)?;
        while self.ctx.is_running() {
            if self.scheduler.is_complete(&self.ctx.clock) {
                self.finish(sink)?;
                break;
            }
            self.tick(sink)?;
        }
        Ok(())
    }

    /// Wait out the start delay and fire the kickoff transition.  The kickoff
    /// counts as the first automatic cycle.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<Transition> {
        debug_assert_eq!(self.ctx.phase, RunPhase::Pending, "start called twice");
        sink.emit(&AppEvent::Started {
            initial: self.ctx.state,
            max_cycles: self.scheduler.max_cycles(),
        });
        info!(
            "OverrideLoop: starting in {} (period {:?}, {} cycles)",
            self.ctx.state, self.schedule.command_cycle_period, self.schedule.max_cycles
        );

        self.clock.sleep(self.schedule.start_delay);
        self.ctx.phase = RunPhase::Running;
        self.fire(Trigger::Automatic, sink)
    }

    /// One poll iteration: sleep a slice, then fire at most one transition.
    ///
    /// Returns the recorded row if something fired.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> Result<Option<Transition>> {
        if !self.ctx.is_running() {
            return Ok(None);
        }
        self.clock.sleep(self.schedule.poll_interval);

        let key = self.input.poll_key()?;
        let elapsed = self.clock.monotonic();
        match self.scheduler.decide(key, elapsed, &self.ctx.clock) {
            Some(trigger) => self.fire(trigger, sink).map(Some),
            None => Ok(None),
        }
    }

    /// Append the synthetic sentinel row, persist a final time and stop.
    ///
    /// The sentinel sits half a command period after the last real
    /// transition and always reads [`SENTINEL_STATE`].  No command is sent.
    pub fn finish(&mut self, sink: &mut impl EventSink) -> Result<Transition> {
        let offset = TimeDelta::from_std(self.schedule.sentinel_offset()).unwrap_or(TimeDelta::zero());
        let last = self.ctx.clock.last_transition;
        let at = last.checked_add_signed(offset).unwrap_or(last);
        let sentinel = self.log.append(Transition::new(at, SENTINEL_STATE));

        self.persister.write_snapshot(&self.log.snapshot())?;
        self.ctx.phase = RunPhase::Terminated;

        info!(
            "OverrideLoop: finished after {} automatic + {} manual transitions",
            self.ctx.clock.cycle_count, self.ctx.manual_count
        );
        sink.emit(&AppEvent::Finished {
            sentinel,
            log: &self.log,
        });
        Ok(sentinel)
    }

    // ── State-change transaction ──────────────────────────────

    /// Send one toggle, then record and persist the resulting state.
    ///
    /// Nothing is recorded unless the device accepted the command, and every
    /// accepted command gets exactly one row.  The in-memory state only flips
    /// after the row has been persisted.
    fn fire(&mut self, trigger: Trigger, sink: &mut impl EventSink) -> Result<Transition> {
        self.device.send_toggle()?;
        let now = self.clock.now();
        let mark = self.clock.monotonic();

        let next_state = self.ctx.state.toggled();
        let record = self.log.append(Transition::new(now, next_state));
        self.ctx.clock.mark(record.timestamp, mark, trigger);
        if trigger == Trigger::Manual {
            self.ctx.manual_count += 1;
        }
        let next_automatic = self
            .scheduler
            .next_deadline(&self.ctx.clock)
            .unwrap_or(record.timestamp);

        self.persister.write_snapshot(&self.log.snapshot())?;

        info!(
            "OverrideLoop: {} transition -> {} (cycle {}/{})",
            trigger,
            next_state,
            self.ctx.clock.cycle_count,
            self.scheduler.max_cycles()
        );
        debug!("OverrideLoop: next automatic transition at {}", next_automatic);
        sink.emit(&AppEvent::TransitionFired {
            record,
            trigger,
            cycle: self.ctx.clock.cycle_count,
            next_automatic,
            log: &self.log,
        });

        self.ctx.state = next_state;
        Ok(record)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> DeviceState {
        self.ctx.state
    }

    pub fn phase(&self) -> RunPhase {
        self.ctx.phase
    }

    /// Automatic transitions fired so far.
    pub fn cycle_count(&self) -> u32 {
        self.ctx.clock.cycle_count
    }

    pub fn manual_count(&self) -> u32 {
        self.ctx.manual_count
    }

    pub fn last_transition_time(&self) -> DateTime<Local> {
        self.ctx.clock.last_transition
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Tear the loop apart, e.g. to restore the terminal held by the input.
    pub fn into_parts(self) -> (D, I, P, C, TransitionLog) {
        (self.device, self.input, self.persister, self.clock, self.log)
    }
}
