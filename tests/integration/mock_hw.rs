//! Mock ports for integration tests.
//!
//! A simulated clock that only moves when the loop sleeps, a keyboard that
//! replays a script of timed key presses, a device that counts (and can
//! refuse) toggle commands, a persister that keeps every snapshot, and a
//! sink that records every event.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone};
use solenoid_cycler::app::events::AppEvent;
use solenoid_cycler::app::ports::{
    Clock, DeviceChannel, DeviceError, EventSink, InputError, OperatorInput, PersistError,
    Persister,
};
use solenoid_cycler::app::service::OverrideLoop;
use solenoid_cycler::config::ScheduleConfig;
use solenoid_cycler::fsm::Trigger;
use solenoid_cycler::transition_log::{Snapshot, Transition};

pub fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

pub fn at_ms(ms: i64) -> DateTime<Local> {
    t0() + TimeDelta::milliseconds(ms)
}

// ── SimClock ──────────────────────────────────────────────────

/// Wall clock and monotonic reading that only move when the loop sleeps.
/// [`step_wall`](Self::step_wall) moves the wall clock alone, like an NTP
/// correction.
#[derive(Clone)]
pub struct SimClock {
    now: Rc<Cell<DateTime<Local>>>,
    mono: Rc<Cell<Duration>>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            mono: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + TimeDelta::from_std(by).unwrap());
        self.mono.set(self.mono.get() + by);
    }

    pub fn step_wall(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }

    fn monotonic(&self) -> Duration {
        self.mono.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

// ── ScriptedInput ─────────────────────────────────────────────

/// Replays key presses once the shared clock reaches their timestamp.
pub struct ScriptedInput {
    clock: SimClock,
    presses: Vec<(DateTime<Local>, u8)>,
    fail_at: Option<DateTime<Local>>,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new(clock: SimClock, mut presses: Vec<(DateTime<Local>, u8)>) -> Self {
        presses.sort_by_key(|(at, _)| *at);
        Self {
            clock,
            presses,
            fail_at: None,
        }
    }

    pub fn silent(clock: SimClock) -> Self {
        Self::new(clock, Vec::new())
    }

    pub fn failing_at(mut self, at: DateTime<Local>) -> Self {
        self.fail_at = Some(at);
        self
    }
}

impl OperatorInput for ScriptedInput {
    fn poll_key(&mut self) -> Result<Option<u8>, InputError> {
        let now = self.clock.now();
        if self.fail_at.is_some_and(|at| now >= at) {
            return Err(InputError::Terminal("tty went away".into()));
        }
        match self.presses.first() {
            Some((at, key)) if *at <= now => {
                let key = *key;
                self.presses.remove(0);
                Ok(Some(key))
            }
            _ => Ok(None),
        }
    }
}

// ── MockDevice ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDevice {
    pub sent: usize,
    /// 1-based attempt number that fails.
    pub fail_on: Option<usize>,
    attempts: usize,
}

#[allow(dead_code)]
impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }
}

impl DeviceChannel for MockDevice {
    fn send_toggle(&mut self) -> Result<(), DeviceError> {
        self.attempts += 1;
        if self.fail_on == Some(self.attempts) {
            return Err(DeviceError::Write("port unplugged".into()));
        }
        self.sent += 1;
        Ok(())
    }
}

// ── MemoryPersister ───────────────────────────────────────────

#[derive(Default)]
pub struct MemoryPersister {
    pub writes: Vec<Vec<Transition>>,
    /// 1-based write number that fails.
    pub fail_on: Option<usize>,
}

#[allow(dead_code)]
impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(write: usize) -> Self {
        Self {
            fail_on: Some(write),
            ..Self::default()
        }
    }

    /// What would be on disk now.
    pub fn on_disk(&self) -> &[Transition] {
        self.writes.last().map_or(&[], Vec::as_slice)
    }
}

impl Persister for MemoryPersister {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), PersistError> {
        if self.fail_on == Some(self.writes.len() + 1) {
            return Err(PersistError::Write {
                path: "memory".into(),
                reason: "disk full".into(),
            });
        }
        self.writes.push(snapshot.to_vec());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Started,
    Fired { trigger: Trigger, cycle: u32, rows: usize },
    Finished { rows: usize },
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<Recorded>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> Vec<Trigger> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Fired { trigger, .. } => Some(*trigger),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent<'_>) {
        self.events.push(match event {
            AppEvent::Started { .. } => Recorded::Started,
            AppEvent::TransitionFired {
                trigger, cycle, log, ..
            } => Recorded::Fired {
                trigger: *trigger,
                cycle: *cycle,
                rows: log.len(),
            },
            AppEvent::Finished { log, .. } => Recorded::Finished { rows: log.len() },
        });
    }
}

// ── Builders ──────────────────────────────────────────────────

pub type MockLoop = OverrideLoop<MockDevice, ScriptedInput, MemoryPersister, SimClock>;

pub fn schedule(period: Duration, max_cycles: u32) -> ScheduleConfig {
    ScheduleConfig::with_period(period)
        .unwrap()
        .with_max_cycles(max_cycles)
        .unwrap()
}

/// Loop starting at [`t0`] with the given key script.
#[allow(dead_code)]
pub fn make_loop(period: Duration, max_cycles: u32, presses: Vec<(DateTime<Local>, u8)>) -> MockLoop {
    let clock = SimClock::new(t0());
    let input = ScriptedInput::new(clock.clone(), presses);
    OverrideLoop::new(
        schedule(period, max_cycles),
        MockDevice::new(),
        input,
        MemoryPersister::new(),
        clock,
    )
}
