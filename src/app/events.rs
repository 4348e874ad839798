//! Outbound application events.
//!
//! The [`OverrideLoop`](super::service::OverrideLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: redraw the operator console, write a log
//! line, or record them in a test.

use chrono::{DateTime, Local};

use crate::fsm::{DeviceState, Trigger};
use crate::transition_log::{Transition, TransitionLog};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent<'a> {
    /// The run has begun; the device is assumed to be in `initial`.
    Started {
        initial: DeviceState,
        max_cycles: u32,
    },

    /// A command was sent, recorded and persisted.
    TransitionFired {
        record: Transition,
        trigger: Trigger,
        /// Automatic cycles completed, including this one if it was automatic.
        cycle: u32,
        /// When the next automatic command will go out if nobody intervenes.
        /// Informational only; the schedule is re-derived every tick.
        next_automatic: DateTime<Local>,
        /// The table as it stands after this transition.
        log: &'a TransitionLog,
    },

    /// The cycle limit was reached and the trailing sentinel row was written.
    Finished {
        sentinel: Transition,
        log: &'a TransitionLog,
    },
}
