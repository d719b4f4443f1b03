//! Test utilities for stepstick-rs integration tests
//!
//! The driver lines, the step timer and the pulse delay are replaced by
//! recording doubles so every hardware interaction can be asserted on.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use stepstick_rs::{DriverPin, DriverPins, PeriodicTimer, StepperController};

use lazy_static::lazy_static;
use std::sync::{Mutex, MutexGuard};

pub fn init_env() {
    // Ignore "already initialized" from earlier tests in the same binary
    let _ = env_logger::builder().is_test(true).try_init();
}

// Global mutex for tests that share a static controller
lazy_static! {
    pub static ref TEST_MUTEX: Mutex<()> = Mutex::new(());
}

/// Lock `TEST_MUTEX`, surviving a previous test's panic
#[allow(dead_code)]
pub fn serial_guard() -> MutexGuard<'static, ()> {
    TEST_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Test result type
pub type TestResult<T> = Result<T, TestError>;

/// Test error type
#[derive(Debug)]
#[allow(dead_code)]
pub enum TestError {
    Stepper(stepstick_rs::Error),
    Assertion(String),
}

impl From<stepstick_rs::Error> for TestError {
    fn from(err: stepstick_rs::Error) -> Self {
        Self::Stepper(err)
    }
}

impl From<&str> for TestError {
    fn from(err: &str) -> Self {
        Self::Assertion(err.to_string())
    }
}

/// Error raised by the doubles when told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

/// Driver lines that remember every call
#[derive(Debug, Default)]
pub struct RecordingPins {
    pub configured: Vec<(DriverPin, PinState)>,
    pub writes: Vec<(DriverPin, PinState)>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl RecordingPins {
    /// Current level of `pin`, if it was ever driven
    pub fn level(&self, pin: DriverPin) -> Option<PinState> {
        self.writes
            .iter()
            .rev()
            .chain(self.configured.iter().rev())
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }

    /// `(MS1, MS2, MS3)` levels
    pub fn microstep_levels(&self) -> [Option<PinState>; 3] {
        DriverPin::MICROSTEP.map(|pin| self.level(pin))
    }

    pub fn clear(&mut self) {
        self.configured.clear();
        self.writes.clear();
    }
}

impl DriverPins for RecordingPins {
    type Error = MockFault;

    fn configure_output(&mut self, pin: DriverPin, initial: PinState) -> Result<(), MockFault> {
        self.configured.push((pin, initial));
        Ok(())
    }

    fn write(&mut self, pin: DriverPin, level: PinState) -> Result<(), MockFault> {
        if self.fail_writes {
            return Err(MockFault);
        }
        self.writes.push((pin, level));
        Ok(())
    }
}

/// Timer that records each arm request
#[derive(Debug, Default)]
pub struct RecordingTimer {
    pub armed: Vec<u32>,
    pub fail: bool,
}

impl PeriodicTimer for RecordingTimer {
    type Error = MockFault;

    fn arm(&mut self, interval_us: u32) -> Result<(), MockFault> {
        if self.fail {
            return Err(MockFault);
        }
        self.armed.push(interval_us);
        Ok(())
    }
}

/// Delay that records requested waits instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ns: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(ns);
    }
}

pub type TestStepper = StepperController<RecordingPins, RecordingTimer, RecordingDelay>;

/// Test context holding a controller wired to the recording doubles
#[derive(Debug)]
pub struct TestContext {
    pub stepper: TestStepper,
}

#[allow(dead_code)]
impl TestContext {
    /// Controller with default settings, not started
    pub fn new() -> Self {
        Self {
            stepper: new_stepper(),
        }
    }

    /// Controller after `begin`, with the start-up writes cleared
    pub fn started() -> TestResult<Self> {
        let mut ctx = Self::new();
        ctx.stepper.begin()?;
        ctx.stepper.pins_mut().clear();
        Ok(ctx)
    }

    pub fn pins(&self) -> &RecordingPins {
        self.stepper.pins()
    }

    pub fn armed(&self) -> &[u32] {
        &self.stepper.timer().armed
    }
}

pub fn new_stepper() -> TestStepper {
    StepperController::new(
        RecordingPins::default(),
        RecordingTimer::default(),
        RecordingDelay::default(),
    )
}
