//! Basic example running the stepper controller on the host.
//!
//! This example shows how to:
//! - Wire eight output pins into a `PinSet`
//! - Start the controller and hand it to the timer "interrupt"
//! - Change speed and microstep mode from the main context
//! - Stop with and without coil hold
//!
//! Pins log their transitions instead of toggling hardware, and a thread plays
//! the periodic timer. Set `STEPSTICK_DEMO_RPM` (or put it in `.env`) to pick the
//! speed and `RUST_LOG=trace` to see every line change.

use std::env;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use log::{info, trace};
use stepstick_rs::{
    Config, DriverPin, MicrostepMode, PeriodicTimer, PinSet, SharedStepper, StepperController,
    MAX_STEP_INTERVAL_US,
};

/// Speed used when `STEPSTICK_DEMO_RPM` is not set
const DEFAULT_RPM: u32 = 60;

static TIMER_INTERVAL_US: AtomicU32 = AtomicU32::new(MAX_STEP_INTERVAL_US);
static TIMER_RUNNING: AtomicBool = AtomicBool::new(true);

static STEPPER: SharedStepper<PinSet<LogPin>, ThreadTimer, StdDelay> = SharedStepper::new();

/// Output pin that logs its level
#[derive(Debug)]
struct LogPin(DriverPin);

impl ErrorType for LogPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for LogPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        trace!("{} (pin {}) -> high", self.0.name(), self.0.number());
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        trace!("{} (pin {}) -> low", self.0.name(), self.0.number());
        Ok(())
    }
}

/// Hands the interval to the timer thread
#[derive(Debug)]
struct ThreadTimer;

impl PeriodicTimer for ThreadTimer {
    type Error = core::convert::Infallible;

    fn arm(&mut self, interval_us: u32) -> Result<(), Self::Error> {
        TIMER_INTERVAL_US.store(interval_us, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug)]
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let rpm = env::var("STEPSTICK_DEMO_RPM")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_RPM);

    let pins = PinSet {
        dir: LogPin(DriverPin::Dir),
        step: LogPin(DriverPin::Step),
        sleep: LogPin(DriverPin::Sleep),
        reset: LogPin(DriverPin::Reset),
        ms1: LogPin(DriverPin::Ms1),
        ms2: LogPin(DriverPin::Ms2),
        ms3: LogPin(DriverPin::Ms3),
        enable: LogPin(DriverPin::Enable),
    };

    // === Setup ===
    info!("=== Setup ===");
    let config = Config::default().with_microstep_mode(MicrostepMode::Quarter);
    let mut stepper = StepperController::with_config(pins, ThreadTimer, StdDelay, config)
        .expect("default config is valid");
    stepper.begin().expect("pins and timer are infallible");
    STEPPER.init(stepper);

    let timer = thread::spawn(|| {
        let mut pulses = 0u32;
        while TIMER_RUNNING.load(Ordering::Relaxed) {
            let interval = TIMER_INTERVAL_US.load(Ordering::Relaxed);
            thread::sleep(Duration::from_micros(u64::from(interval)));
            if STEPPER.on_interrupt() {
                pulses += 1;
            }
        }
        pulses
    });

    // === Run forward ===
    info!("=== Forward at {rpm} RPM ===");
    STEPPER.with(|stepper| {
        if stepper.set_speed(rpm).is_err() {
            info!("Speed rejected, keeping {} us", stepper.step_interval());
        }
        stepper.move_now().ok();
    });
    thread::sleep(Duration::from_secs(1));

    // === Reverse, hold on stop ===
    info!("=== Reverse, eighth steps, coil hold ===");
    STEPPER.with(|stepper| {
        stepper.set_reverse(true);
        stepper.set_coil_hold(true);
        stepper.set_microstep_mode(MicrostepMode::Eighth).ok();
    });
    thread::sleep(Duration::from_secs(1));
    STEPPER.with(|stepper| stepper.stop_now().ok());

    // === Cleanup ===
    info!("=== Done ===");
    TIMER_RUNNING.store(false, Ordering::Relaxed);
    let pulses = timer.join().expect("timer thread panicked");
    info!("Emitted {pulses} step pulses");

    STEPPER.with(|stepper| {
        stepper.set_coil_hold(false);
        stepper.stop_now().ok();
        stepper.dump_debug();
    });
}
