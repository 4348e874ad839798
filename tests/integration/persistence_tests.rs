//! Integration tests: full run through the real serial and CSV adapters.
//!
//! The serial adapter writes into a byte buffer and the CSV persister into a
//! temporary directory; only the clock and keyboard are simulated.

use std::time::Duration;

use solenoid_cycler::adapters::csv_file::CsvFilePersister;
use solenoid_cycler::adapters::serial::SerialDevice;
use solenoid_cycler::app::service::OverrideLoop;

use crate::mock_hw::{RecordingSink, ScriptedInput, SimClock, at_ms, schedule, t0};

#[test]
fn csv_on_disk_matches_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("20240115_log.csv");

    let clock = SimClock::new(t0());
    let input = ScriptedInput::new(clock.clone(), vec![(at_ms(45_000), b'0')]);
    let mut lp = OverrideLoop::new(
        schedule(Duration::from_secs(60), 3),
        SerialDevice::from_writer(Vec::new()),
        input,
        CsvFilePersister::new(&path),
        clock,
    );
    lp.run(&mut RecordingSink::new()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "Timestamp,System State",
            "2024-01-15 09:00:01,On",
            "2024-01-15 09:00:45,Off",
            "2024-01-15 09:01:45,On",
            "2024-01-15 09:02:45,Off",
            "2024-01-15 09:03:15,On",
        ]
    );

    // One command byte per real row, none for the sentinel.
    let (device, ..) = lp.into_parts();
    assert_eq!(device.into_inner(), b"0000");
}

#[test]
fn aborted_run_leaves_last_good_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.csv");

    struct Flaky(usize);
    impl std::io::Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0 += 1;
            if self.0 == 3 {
                return Err(std::io::Error::other("cable pulled"));
            }
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let clock = SimClock::new(t0());
    let mut lp = OverrideLoop::new(
        schedule(Duration::from_secs(1), 20),
        SerialDevice::from_writer(Flaky(0)),
        ScriptedInput::silent(clock.clone()),
        CsvFilePersister::new(&path),
        clock,
    );
    assert!(lp.run(&mut RecordingSink::new()).is_err());

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3, "header + the two accepted toggles");
    assert!(text.ends_with(",Off\n"));
}
