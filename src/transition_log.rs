//! In-memory transition table.
//!
//! Append-only and chronological: the override loop is the only writer and it
//! appends in the order transitions fire.  A row stamped earlier than its
//! predecessor (the wall clock stepped back) is raised to the predecessor's
//! timestamp.  Persisters and the
//! console only ever see a [`Snapshot`], which stays valid while the loop
//! keeps appending.

use std::fmt::Write as _;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::warn;

use crate::fsm::DeviceState;

/// Timestamp layout used in the table and the CSV file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column headers, in file order.
pub const COLUMNS: [&str; 2] = ["Timestamp", "System State"];

// ═══════════════════════════════════════════════════════════════
//  Transition
// ═══════════════════════════════════════════════════════════════

/// One row of the table: when it happened and the state it left the device in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub timestamp: DateTime<Local>,
    pub state: DeviceState,
}

impl Transition {
    pub fn new(timestamp: DateTime<Local>, state: DeviceState) -> Self {
        Self { timestamp, state }
    }

    /// Timestamp at second resolution, e.g. `2024-01-15 09:00:00`.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Snapshot
// ═══════════════════════════════════════════════════════════════

/// Immutable copy of the table at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<[Transition]>);

impl Snapshot {
    pub fn rows(&self) -> &[Transition] {
        &self.0
    }
}

impl Deref for Snapshot {
    type Target = [Transition];

    fn deref(&self) -> &[Transition] {
        &self.0
    }
}

// ═══════════════════════════════════════════════════════════════
//  TransitionLog
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    rows: Vec<Transition>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row and return it as stored, with its timestamp clamped so
    /// the table never goes backwards in time.
    pub fn append(&mut self, transition: Transition) -> Transition {
        let mut row = transition;
        if let Some(prev) = self.rows.last().filter(|prev| prev.timestamp > row.timestamp) {
            warn!(
                "TransitionLog: wall clock went back from {} to {}; keeping {}",
                prev.timestamp_text(),
                row.timestamp_text(),
                prev.timestamp_text()
            );
            row.timestamp = prev.timestamp;
        }
        self.rows.push(row);
        row
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::from(self.rows.as_slice()))
    }

    pub fn rows(&self) -> &[Transition] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Transition> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Console table: an index column followed by the two data columns,
    /// every column right-aligned to its widest cell.
    ///
    /// ```text
    ///              Timestamp System State
    /// 0  2024-01-15 09:00:01           On
    /// 1  2024-01-15 09:01:01          Off
    /// ```
    pub fn render(&self) -> String {
        let stamps: Vec<String> = self.rows.iter().map(Transition::timestamp_text).collect();

        let index_w = self.rows.len().saturating_sub(1).to_string().len();
        let stamp_w = stamps
            .iter()
            .map(String::len)
            .chain([COLUMNS[0].len()])
            .max()
            .unwrap_or(0);
        let state_w = self
            .rows
            .iter()
            .map(|r| r.state.label().len())
            .chain([COLUMNS[1].len()])
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = write!(
            out,
            "{:index_w$}  {:>stamp_w$} {:>state_w$}",
            "", COLUMNS[0], COLUMNS[1]
        );
        for (i, (row, stamp)) in self.rows.iter().zip(&stamps).enumerate() {
            let _ = write!(
                out,
                "\n{:<index_w$}  {:>stamp_w$} {:>state_w$}",
                i,
                stamp,
                row.state.label()
            );
        }
        out
    }
}
