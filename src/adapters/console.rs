//! Operator console event sink.
//!
//! Implements [`EventSink`] by redrawing the transition table and a status
//! line on the operator's terminal after every transition, and by mirroring
//! each event to the `log` facade.
//!
//! The keyboard adapter keeps the terminal in raw mode while the loop runs,
//! so every line is terminated with `\r\n`.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use crossterm::{cursor, queue, terminal};
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::DeviceState;
use crate::transition_log::TIMESTAMP_FORMAT;

const EOL: &str = "\r\n";

/// Adapter that renders every [`AppEvent`] to a terminal.
pub struct ConsoleEventSink<W: Write> {
    out: W,
    clear_screen: bool,
    override_key: char,
}

impl ConsoleEventSink<io::Stdout> {
    pub fn stdout(override_key: u8) -> Self {
        Self::new(io::stdout(), override_key, true)
    }
}

impl<W: Write> ConsoleEventSink<W> {
    pub fn new(out: W, override_key: u8, clear_screen: bool) -> Self {
        Self {
            out,
            clear_screen,
            override_key: char::from(override_key),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, table: &str, footer: &[String]) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
        }
        for line in table.lines() {
            write!(self.out, "{line}{EOL}")?;
        }
        write!(self.out, "{EOL}")?;
        for line in footer {
            write!(self.out, "{line}{EOL}")?;
        }
        self.out.flush()
    }
}

/// Two-line status shown under the table after a transition.
pub fn status_message(state: DeviceState, next_automatic: DateTime<Local>, override_key: char) -> [String; 2] {
    let at = next_automatic.format(TIMESTAMP_FORMAT);
    match state {
        DeviceState::On => [
            "System Activated.".to_string(),
            format!(
                "System will automatically deactivate at {at}, or press {override_key} to deactivate system."
            ),
        ],
        DeviceState::Off => [
            "System Deactivated.".to_string(),
            format!(
                "System will automatically activate at {at}, or press {override_key} to activate system."
            ),
        ],
    }
}

impl<W: Write> EventSink for ConsoleEventSink<W> {
    fn emit(&mut self, event: &AppEvent<'_>) {
        let result = match event {
            AppEvent::Started { initial, max_cycles } => {
                info!("START | initial_state={} | cycles={}", initial, max_cycles);
                Ok(())
            }
            AppEvent::TransitionFired {
                record,
                trigger,
                cycle,
                next_automatic,
                log,
            } => {
                info!(
                    "STATE | {} -> {} | trigger={} | cycle={} | next={}",
                    record.timestamp_text(),
                    record.state,
                    trigger,
                    cycle,
                    next_automatic.format(TIMESTAMP_FORMAT)
                );
                let footer = status_message(record.state, *next_automatic, self.override_key);
                self.write_lines(&log.render(), &footer)
            }
            AppEvent::Finished { sentinel, log } => {
                info!(
                    "DONE  | sentinel {} {} | rows={}",
                    sentinel.timestamp_text(),
                    sentinel.state,
                    log.len()
                );
                let footer = [format!("Activation cycling complete. {} rows recorded.", log.len())];
                self.write_lines(&log.render(), &footer)
            }
        };
        if let Err(e) = result {
            warn!("Console: redraw failed: {}", e);
        }
    }
}
