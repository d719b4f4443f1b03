//! A generic, `no_std` Rust driver for step/direction microstepping stepper drivers
//! (A4988, DRV8825 and compatible "StepStick" boards).
//!
//! The driver owns three collaborators: the eight driver lines ([`DriverPins`]), a
//! periodic hardware timer ([`PeriodicTimer`]) and an `embedded-hal` delay used for
//! the step pulse width. Every timer firing calls [`StepperController::on_tick`],
//! which emits one step pulse while movement is allowed. Use [`SharedStepper`] to
//! reach the controller from the timer interrupt.
//!
//! Diagnostics go through the `log` facade.

#![no_std]

pub mod config;
pub mod direction;
pub mod enums;
mod errors;
pub mod helpers;
pub mod pins;
pub mod shared;
pub mod timer;

pub use config::Config;
pub use direction::Direction;
pub use enums::MicrostepMode;
pub use errors::Error;
pub use helpers::{
    is_valid_step_interval, pulse_width_for, rpm_to_step_interval, step_interval_to_rpm,
    step_pulse_interval, DEFAULT_STEPS_PER_REV, MAX_STEP_INTERVAL_US, MIN_STEP_INTERVAL_US,
    STEP_PULSE_WIDTH_US,
};
pub use pins::{DriverPin, DriverPins, PinSet};
pub use shared::SharedStepper;
pub use timer::PeriodicTimer;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{debug, error, trace};

type Result<T> = core::result::Result<T, Error>;

/// Point-in-time copy of the controller state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub microstep_mode: MicrostepMode,
    pub step_interval_us: u32,
    pub steps_per_revolution: u32,
    /// Full-step speed implied by the interval.
    pub rpm: u32,
    pub can_move: bool,
    pub is_moving: bool,
    pub coil_hold: bool,
    pub reverse: bool,
}

/// Controller for one motor behind a step/dir driver.
///
/// Two motion states exist: stopped (`can_move == false`) and running
/// (`can_move == true`). The timer keeps firing in both; pulses are only
/// emitted while running.
#[derive(Debug)]
pub struct StepperController<P, T, D> {
    pins: P,
    timer: T,
    delay: D,
    microstep_mode: MicrostepMode,
    step_interval_us: u32,
    steps_per_revolution: u32,
    pulse_width_us: u32,
    is_moving: bool,
    can_move: bool,
    coil_hold: bool,
    reverse: bool,
}

impl<P, T, D> StepperController<P, T, D>
where
    P: DriverPins,
    T: PeriodicTimer,
    D: DelayNs,
{
    /// Creates a controller with the default [`Config`]. No hardware is touched
    /// until [`begin`](Self::begin).
    pub fn new(pins: P, timer: T, delay: D) -> Self {
        Self::from_config(pins, timer, delay, Config::default())
    }

    /// Creates a controller from an explicit configuration.
    ///
    /// # Errors
    /// Returns the first error reported by [`Config::validate`].
    pub fn with_config(pins: P, timer: T, delay: D, config: Config) -> Result<Self> {
        if let Err(err) = config.validate() {
            error!("Rejected stepper config: {}", err.as_str());
            return Err(err);
        }
        Ok(Self::from_config(pins, timer, delay, config))
    }

    const fn from_config(pins: P, timer: T, delay: D, config: Config) -> Self {
        Self {
            pins,
            timer,
            delay,
            microstep_mode: config.microstep_mode,
            step_interval_us: config.step_interval_us,
            steps_per_revolution: config.steps_per_revolution,
            pulse_width_us: config.pulse_width_us,
            is_moving: false,
            can_move: false,
            coil_hold: config.coil_hold,
            reverse: config.reverse,
        }
    }

    /// Drives every line to its safe level and arms the timer.
    ///
    /// DIR forward, STEP low, MS lines on the configured mode, SLEEP and RESET
    /// deasserted (high) and ENABLE high, which leaves the coils unpowered.
    /// Call once, before anything else.
    ///
    /// # Errors
    /// Returns `Error::Pin` or `Error::Timer` if the hardware refuses.
    pub fn begin(&mut self) -> Result<()> {
        debug!(
            "Starting stepper: {} step, interval {} us",
            self.microstep_mode.name(),
            self.step_interval_us
        );
        for pin in DriverPin::ALL {
            let level = self.initial_level(pin);
            self.pins
                .configure_output(pin, level)
                .map_err(|_| Error::Pin)?;
        }
        self.arm_timer()
    }

    fn initial_level(&self, pin: DriverPin) -> PinState {
        let [ms1, ms2, ms3] = self.microstep_mode.levels();
        match pin {
            DriverPin::Dir => Direction::Forward.level(),
            DriverPin::Step => PinState::Low,
            DriverPin::Ms1 => ms1,
            DriverPin::Ms2 => ms2,
            DriverPin::Ms3 => ms3,
            DriverPin::Sleep | DriverPin::Reset | DriverPin::Enable => PinState::High,
        }
    }

    #[must_use]
    pub const fn microstep_mode(&self) -> MicrostepMode {
        self.microstep_mode
    }

    /// Selects a microstep mode and writes its pattern to MS1..MS3.
    ///
    /// # Errors
    /// Returns `Error::Pin` if a selector line cannot be written.
    pub fn set_microstep_mode(&mut self, mode: MicrostepMode) -> Result<()> {
        trace!("Setting microstep mode to {}", mode.name());
        self.microstep_mode = mode;
        for (pin, level) in DriverPin::MICROSTEP.into_iter().zip(mode.levels()) {
            self.write(pin, level)?;
        }
        Ok(())
    }

    /// Selects a microstep mode by raw index (0 = full ... 4 = sixteenth).
    ///
    /// # Errors
    /// Returns `Error::InvalidMicrostepMode` for an unknown index; the current
    /// mode and the selector lines are left as they are.
    pub fn set_microstep_index(&mut self, index: u8) -> Result<()> {
        match MicrostepMode::try_from(index) {
            Ok(mode) => self.set_microstep_mode(mode),
            Err(err) => {
                error!("Invalid microstep mode requested: {index}");
                Err(err)
            }
        }
    }

    #[must_use]
    pub const fn step_interval(&self) -> u32 {
        self.step_interval_us
    }

    /// Sets the time between step pulses. Takes effect the next time the timer is armed.
    ///
    /// # Errors
    /// Returns `Error::StepIntervalOutOfRange` outside
    /// `MIN_STEP_INTERVAL_US..=MAX_STEP_INTERVAL_US`; the previous interval is kept.
    pub fn set_step_interval(&mut self, interval_us: u32) -> Result<()> {
        trace!("Setting step interval to {interval_us}");
        if !is_valid_step_interval(interval_us) {
            error!("Invalid step interval: {interval_us}");
            return Err(Error::StepIntervalOutOfRange);
        }
        self.step_interval_us = interval_us;
        Ok(())
    }

    #[must_use]
    pub const fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    /// Sets the full steps per mechanical revolution, used for RPM conversion.
    ///
    /// Accepted within the step interval bounds.
    ///
    /// # Errors
    /// Returns `Error::StepsPerRevolutionOutOfRange` outside those bounds; the
    /// previous value is kept.
    pub fn set_steps_per_revolution(&mut self, steps: u32) -> Result<()> {
        trace!("Setting steps per revolution to {steps}");
        if !is_valid_step_interval(steps) {
            error!("Invalid steps per revolution: {steps}");
            return Err(Error::StepsPerRevolutionOutOfRange);
        }
        self.steps_per_revolution = steps;
        Ok(())
    }

    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    #[must_use]
    pub const fn can_move(&self) -> bool {
        self.can_move
    }

    /// Opens or closes the pulse gate without touching the coils.
    ///
    /// Closing the gate also clears `is_moving`.
    pub fn set_can_move(&mut self, can_move: bool) {
        self.can_move = can_move;
        if !can_move {
            self.is_moving = false;
        }
    }

    #[must_use]
    pub const fn coil_hold(&self) -> bool {
        self.coil_hold
    }

    /// Keep the coils energized after [`stop_now`](Self::stop_now).
    pub fn set_coil_hold(&mut self, hold: bool) {
        self.coil_hold = hold;
    }

    #[must_use]
    pub const fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        Direction::from_reverse(self.reverse)
    }

    /// Step pulse high time for the current interval.
    #[must_use]
    pub fn pulse_width(&self) -> u32 {
        pulse_width_for(self.step_interval_us, self.pulse_width_us)
    }

    /// Full-step speed implied by the current interval.
    #[must_use]
    pub const fn rpm(&self) -> u32 {
        step_interval_to_rpm(self.step_interval_us, self.steps_per_revolution)
    }

    /// Converts `rpm` to a step interval, applies it and re-arms the timer.
    ///
    /// The interval is `60_000_000 / (rpm * steps_per_revolution)`, truncated.
    /// A result outside the interval bounds is rejected and the timer is
    /// re-armed with the previous interval.
    ///
    /// # Errors
    /// Returns `Error::InvalidSpeed` for `rpm == 0` (nothing else happens),
    /// `Error::StepIntervalOutOfRange` for an out-of-bounds result, and
    /// `Error::Timer` if re-arming fails.
    pub fn set_speed(&mut self, rpm: u32) -> Result<()> {
        debug!("Setting speed to {rpm} RPM");
        let Some(interval_us) = rpm_to_step_interval(rpm, self.steps_per_revolution) else {
            error!("Invalid speed: {rpm} RPM");
            return Err(Error::InvalidSpeed);
        };
        let applied = self.set_step_interval(interval_us);
        self.arm_timer()?;
        applied
    }

    /// Energizes the coils (ENABLE is active low).
    ///
    /// # Errors
    /// Returns `Error::Pin` if ENABLE cannot be written.
    pub fn coils_on(&mut self) -> Result<()> {
        trace!("coils on");
        self.write(DriverPin::Enable, PinState::Low)
    }

    /// De-energizes the coils.
    ///
    /// # Errors
    /// Returns `Error::Pin` if ENABLE cannot be written.
    pub fn coils_off(&mut self) -> Result<()> {
        trace!("coils off");
        self.write(DriverPin::Enable, PinState::High)
    }

    /// Starts stepping on the next timer firing and powers the coils.
    ///
    /// # Errors
    /// Returns `Error::Pin` if ENABLE cannot be written.
    pub fn move_now(&mut self) -> Result<()> {
        debug!("Moving");
        self.can_move = true;
        self.coils_on()
    }

    /// Stops stepping immediately. The coils stay powered only with coil hold.
    ///
    /// # Errors
    /// Returns `Error::Pin` if ENABLE cannot be written.
    pub fn stop_now(&mut self) -> Result<()> {
        debug!("Stopping");
        self.is_moving = false;
        self.can_move = false;
        if self.coil_hold {
            return Ok(());
        }
        self.coils_off()
    }

    /// Timer callback. Emits one step pulse if movement is allowed.
    ///
    /// Returns `Ok(false)` without touching any pin while stopped. Missed
    /// firings are not caught up.
    ///
    /// # Errors
    /// Returns `Error::Pin` if DIR or STEP cannot be written.
    pub fn on_tick(&mut self) -> Result<bool> {
        if !self.can_move {
            return Ok(false);
        }
        self.is_moving = true;

        self.write(DriverPin::Dir, self.direction().level())?;

        self.write(DriverPin::Step, PinState::High)?;
        let width = self.pulse_width();
        self.delay.delay_us(width);
        self.write(DriverPin::Step, PinState::Low)?;
        Ok(true)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            microstep_mode: self.microstep_mode,
            step_interval_us: self.step_interval_us,
            steps_per_revolution: self.steps_per_revolution,
            rpm: self.rpm(),
            can_move: self.can_move,
            is_moving: self.is_moving,
            coil_hold: self.coil_hold,
            reverse: self.reverse,
        }
    }

    /// Logs the full status at trace level.
    pub fn dump_debug(&self) {
        let status = self.status();
        trace!("Stepper status:");
        trace!("microstep mode = {}", status.microstep_mode.name());
        trace!("step interval = {} us", status.step_interval_us);
        trace!("speed = {} RPM", status.rpm);
        trace!("can move = {}", status.can_move);
        trace!("is moving = {}", status.is_moving);
        trace!("coil hold = {}", status.coil_hold);
        trace!("direction = {}", self.direction().name());
    }

    pub const fn pins(&self) -> &P {
        &self.pins
    }

    pub const fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    pub const fn timer(&self) -> &T {
        &self.timer
    }

    pub const fn delay(&self) -> &D {
        &self.delay
    }

    /// Gives the collaborators back.
    pub fn release(self) -> (P, T, D) {
        (self.pins, self.timer, self.delay)
    }

    fn arm_timer(&mut self) -> Result<()> {
        trace!("Arming step timer at {} us", self.step_interval_us);
        self.timer
            .arm(self.step_interval_us)
            .map_err(|_| Error::Timer)
    }

    fn write(&mut self, pin: DriverPin, level: PinState) -> Result<()> {
        self.pins.write(pin, level).map_err(|_| {
            error!("Failed to drive {} (pin {})", pin.name(), pin.number());
            Error::Pin
        })
    }
}
