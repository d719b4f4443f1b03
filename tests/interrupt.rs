//! Tests for driving the controller from a timer interrupt through `SharedStepper`
//!
//! The controller lives in a `static`, as it would on a microcontroller, so
//! tests serialize on `TEST_MUTEX` and install a fresh controller each time.

mod test_utils;

use embedded_hal::digital::PinState::{High, Low};
use stepstick_rs::{DriverPin, SharedStepper};
use test_utils::{
    init_env, new_stepper, serial_guard, RecordingDelay, RecordingPins, RecordingTimer,
    TestResult,
};

static STEPPER: SharedStepper<RecordingPins, RecordingTimer, RecordingDelay> =
    SharedStepper::new();

fn install() -> TestResult<()> {
    let mut stepper = new_stepper();
    stepper.begin()?;
    stepper.pins_mut().clear();
    STEPPER.init(stepper);
    Ok(())
}

/// Test firings before any controller is installed are ignored
#[test]
fn test_interrupt_without_controller() {
    init_env();
    let _guard = serial_guard();

    STEPPER.take();
    assert!(!STEPPER.on_interrupt());
    assert_eq!(STEPPER.with(|stepper| stepper.can_move()), None);
}

/// Test interrupts gate on can_move and pulse once running
#[test]
fn test_interrupt_pulses_when_running() -> TestResult<()> {
    init_env();
    let _guard = serial_guard();
    println!("=== Test: interrupt pulses ===");

    install()?;

    assert!(!STEPPER.on_interrupt());
    STEPPER.with(|stepper| stepper.move_now()).ok_or("no controller")??;

    for _ in 0..3 {
        assert!(STEPPER.on_interrupt());
    }

    let stepper = STEPPER.take().ok_or("no controller")?;
    assert!(stepper.is_moving());
    let steps = stepper
        .pins()
        .writes
        .iter()
        .filter(|write| **write == (DriverPin::Step, High))
        .count();
    assert_eq!(steps, 3);
    assert_eq!(stepper.delay().waits_ns.len(), 3);
    Ok(())
}

/// Test a firing arriving while the controller is borrowed is dropped
#[test]
fn test_reentrant_interrupt_is_skipped() -> TestResult<()> {
    init_env();
    let _guard = serial_guard();

    install()?;
    STEPPER.with(|stepper| stepper.set_can_move(true));

    let nested = STEPPER.with(|_| STEPPER.on_interrupt());
    assert_eq!(nested, Some(false));
    assert_eq!(STEPPER.with(|_| STEPPER.with(|_| ())), Some(None));

    let stepper = STEPPER.take().ok_or("no controller")?;
    assert!(stepper.pins().writes.is_empty());
    assert!(!stepper.is_moving());
    Ok(())
}

/// Test stopping from the main context halts pulses on the next firing
#[test]
fn test_stop_from_main_context() -> TestResult<()> {
    init_env();
    let _guard = serial_guard();

    install()?;
    STEPPER.with(|stepper| stepper.move_now()).ok_or("no controller")??;
    assert!(STEPPER.on_interrupt());

    STEPPER.with(|stepper| stepper.stop_now()).ok_or("no controller")??;
    assert!(!STEPPER.on_interrupt());

    let stepper = STEPPER.take().ok_or("no controller")?;
    assert!(!stepper.is_moving());
    assert_eq!(stepper.pins().level(DriverPin::Enable), Some(High));
    assert_eq!(stepper.pins().level(DriverPin::Step), Some(Low));
    Ok(())
}

/// Test a pin fault inside the interrupt is contained
#[test]
fn test_interrupt_pin_fault() -> TestResult<()> {
    init_env();
    let _guard = serial_guard();

    install()?;
    STEPPER.with(|stepper| {
        stepper.set_can_move(true);
        stepper.pins_mut().fail_writes = true;
    });

    assert!(!STEPPER.on_interrupt());
    STEPPER.take();
    Ok(())
}

/// Test speed changes from the main context re-arm the timer
#[test]
fn test_set_speed_through_shared() -> TestResult<()> {
    init_env();
    let _guard = serial_guard();

    install()?;
    STEPPER.with(|stepper| stepper.set_speed(300)).ok_or("no controller")??;

    let stepper = STEPPER.take().ok_or("no controller")?;
    assert_eq!(stepper.step_interval(), 1000);
    assert_eq!(stepper.timer().armed.last(), Some(&1000));
    Ok(())
}
