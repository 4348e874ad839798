//! Integration tests: every port failure stops the run with nothing half-recorded.

use std::time::Duration;

use solenoid_cycler::app::ports::{DeviceError, InputError, PersistError};
use solenoid_cycler::app::service::OverrideLoop;
use solenoid_cycler::error::Error;
use solenoid_cycler::fsm::RunPhase;

use crate::mock_hw::{
    MemoryPersister, MockDevice, RecordingSink, Recorded, ScriptedInput, SimClock, at_ms, schedule,
    t0,
};

const SECOND: Duration = Duration::from_secs(1);

#[test]
fn send_failure_on_fifth_transition_keeps_first_four() {
    let clock = SimClock::new(t0());
    let mut lp = OverrideLoop::new(
        schedule(SECOND, 20),
        MockDevice::failing_on(5),
        ScriptedInput::silent(clock.clone()),
        MemoryPersister::new(),
        clock,
    );
    let mut sink = RecordingSink::new();

    let err = lp.run(&mut sink).unwrap_err();
    assert!(matches!(err, Error::Device(DeviceError::Write(_))), "{err:?}");

    assert_eq!(lp.device().sent, 4);
    assert_eq!(lp.log().len(), 4, "failed toggle is not recorded");
    assert_eq!(lp.persister().writes.len(), 4);
    assert_eq!(lp.persister().on_disk(), lp.log().rows());
    assert_eq!(lp.phase(), RunPhase::Running, "no sentinel after an abort");
    assert!(!sink.events.iter().any(|e| matches!(e, Recorded::Finished { .. })));
}

#[test]
fn kickoff_send_failure_records_nothing() {
    let clock = SimClock::new(t0());
    let mut lp = OverrideLoop::new(
        schedule(SECOND, 20),
        MockDevice::failing_on(1),
        ScriptedInput::silent(clock.clone()),
        MemoryPersister::new(),
        clock,
    );

    assert!(lp.run(&mut RecordingSink::new()).is_err());
    assert!(lp.log().is_empty());
    assert!(lp.persister().writes.is_empty());
}

#[test]
fn persistence_failure_is_fatal() {
    let clock = SimClock::new(t0());
    let mut lp = OverrideLoop::new(
        schedule(SECOND, 20),
        MockDevice::new(),
        ScriptedInput::silent(clock.clone()),
        MemoryPersister::failing_on(3),
        clock,
    );

    let err = lp.run(&mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, Error::Persistence(PersistError::Write { .. })));
    assert_eq!(lp.persister().writes.len(), 2);
    assert_eq!(lp.device().sent, 3, "the command went out before the write failed");
}

#[test]
fn sentinel_write_failure_is_fatal() {
    let clock = SimClock::new(t0());
    let mut lp = OverrideLoop::new(
        schedule(SECOND, 2),
        MockDevice::new(),
        ScriptedInput::silent(clock.clone()),
        MemoryPersister::failing_on(3),
        clock,
    );

    let err = lp.run(&mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));
    assert_eq!(lp.device().sent, 2);
    assert_ne!(lp.phase(), RunPhase::Terminated);
}

#[test]
fn input_failure_aborts_the_loop() {
    let clock = SimClock::new(t0());
    let input = ScriptedInput::silent(clock.clone()).failing_at(at_ms(2_500));
    let mut lp = OverrideLoop::new(
        schedule(SECOND, 20),
        MockDevice::new(),
        input,
        MemoryPersister::new(),
        clock,
    );

    let err = lp.run(&mut RecordingSink::new()).unwrap_err();
    assert!(matches!(err, Error::Input(InputError::Terminal(_))));
    assert_eq!(lp.device().sent, 2, "kickoff at +1s and one automatic at +2s");
    assert_eq!(lp.log().len(), 2);
}
