//! Serial adapter for the solenoid controller.
//!
//! Implements [`DeviceChannel`] over any [`Write`] sink.  In production the
//! sink is a `serialport` handle opened 8N1 with no flow control; tests use
//! an in-memory buffer.

use std::io::Write;
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::app::ports::{DeviceChannel, DeviceError, TOGGLE_COMMAND};
use crate::error::Error;

/// Write timeout for a single command byte.
const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct SerialDevice<W = Box<dyn SerialPort>> {
    port: W,
    sent: u64,
}

impl SerialDevice {
    /// Open `port` at `baud`.  Failure here is a connection error: the run
    /// never starts.
    pub fn open(port: &str, baud: u32) -> Result<Self, Error> {
        let handle = serialport::new(port, baud)
            .timeout(WRITE_TIMEOUT)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .open()
            .map_err(|e| Error::Connection {
                port: port.to_string(),
                reason: e.to_string(),
            })?;
        info!("Serial: opened {} at {} baud", port, baud);
        Ok(Self::from_writer(handle))
    }
}

impl<W: Write> SerialDevice<W> {
    pub fn from_writer(port: W) -> Self {
        Self { port, sent: 0 }
    }

    /// Command bytes accepted so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.port
    }
}

impl<W: Write> DeviceChannel for SerialDevice<W> {
    fn send_toggle(&mut self) -> Result<(), DeviceError> {
        self.port
            .write_all(&[TOGGLE_COMMAND])
            .map_err(|e| DeviceError::Write(e.to_string()))?;
        self.port
            .flush()
            .map_err(|e| DeviceError::Flush(e.to_string()))?;
        self.sent += 1;
        debug!("Serial: toggle #{} sent", self.sent);
        Ok(())
    }
}
