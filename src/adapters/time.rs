//! System clock adapter.
//!
//! Implements [`Clock`] with the local wall clock for row timestamps, an
//! [`Instant`] taken at construction for the schedule, and a blocking thread
//! sleep.  A wall-clock step never shortens or stretches a cycle.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::app::ports::Clock;

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
