//! Keyboard adapter.
//!
//! Implements [`OperatorInput`] on top of crossterm's event queue.  The
//! terminal is put into raw mode for as long as the adapter lives so single
//! key presses arrive without waiting for Enter; dropping the adapter
//! restores the previous mode.
//!
//! Raw mode also swallows SIGINT, so Ctrl-C is surfaced as
//! [`InputError::Interrupted`] and the run aborts through the normal error path.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};

use crate::app::ports::{InputError, OperatorInput};

pub struct KeyboardInput {
    raw: bool,
}

impl KeyboardInput {
    /// Enter raw mode and start listening.
    pub fn enable() -> Result<Self, InputError> {
        terminal::enable_raw_mode().map_err(|e| InputError::Terminal(e.to_string()))?;
        debug!("Keyboard: raw mode on");
        Ok(Self { raw: true })
    }

    /// Leave raw mode early.  Idempotent.
    pub fn restore(&mut self) {
        if self.raw {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("Keyboard: could not leave raw mode: {}", e);
            }
            self.raw = false;
            debug!("Keyboard: raw mode off");
        }
    }
}

impl Drop for KeyboardInput {
    fn drop(&mut self) {
        self.restore();
    }
}

impl OperatorInput for KeyboardInput {
    fn poll_key(&mut self) -> Result<Option<u8>, InputError> {
        let term = |e: std::io::Error| InputError::Terminal(e.to_string());
        while event::poll(Duration::ZERO).map_err(term)? {
            if let Event::Key(key) = event::read().map_err(term)? {
                if let Some(byte) = decode_key(&key)? {
                    return Ok(Some(byte));
                }
            }
        }
        Ok(None)
    }
}

/// Map a key event to an ASCII byte.  Releases, repeats and non-ASCII keys
/// are dropped; Ctrl-C aborts.
fn decode_key(key: &KeyEvent) -> Result<Option<u8>, InputError> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Err(InputError::Interrupted)
        }
        KeyCode::Char(c) if c.is_ascii() => Ok(Some(c as u8)),
        _ => Ok(None),
    }
}
