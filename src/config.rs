use crate::helpers::{
    is_valid_step_interval, DEFAULT_STEPS_PER_REV, MAX_STEP_INTERVAL_US, STEP_PULSE_WIDTH_US,
};
use crate::{Error, MicrostepMode};

/// Start-up settings for a [`StepperController`](crate::StepperController).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub microstep_mode: MicrostepMode,
    pub step_interval_us: u32,
    pub steps_per_revolution: u32,
    pub coil_hold: bool,
    pub reverse: bool,
    /// Requested step pulse high time; clamped per pulse to fit the interval.
    pub pulse_width_us: u32,
}

impl Default for Config {
    /// Full step, slowest interval, 200 steps/rev, all flags off.
    fn default() -> Self {
        Self {
            microstep_mode: MicrostepMode::Full,
            step_interval_us: MAX_STEP_INTERVAL_US,
            steps_per_revolution: DEFAULT_STEPS_PER_REV,
            coil_hold: false,
            reverse: false,
            pulse_width_us: STEP_PULSE_WIDTH_US,
        }
    }
}

impl Config {
    #[must_use]
    pub const fn with_microstep_mode(mut self, mode: MicrostepMode) -> Self {
        self.microstep_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_step_interval(mut self, interval_us: u32) -> Self {
        self.step_interval_us = interval_us;
        self
    }

    #[must_use]
    pub const fn with_steps_per_revolution(mut self, steps: u32) -> Self {
        self.steps_per_revolution = steps;
        self
    }

    #[must_use]
    pub const fn with_coil_hold(mut self, hold: bool) -> Self {
        self.coil_hold = hold;
        self
    }

    #[must_use]
    pub const fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub const fn with_pulse_width(mut self, pulse_width_us: u32) -> Self {
        self.pulse_width_us = pulse_width_us;
        self
    }

    /// Checks the same bounds the runtime setters enforce.
    ///
    /// # Errors
    /// Returns `Error::StepIntervalOutOfRange` or `Error::StepsPerRevolutionOutOfRange`
    /// for out-of-range values, `Error::InvalidConfig` for a zero pulse width.
    pub const fn validate(&self) -> Result<(), Error> {
        if !is_valid_step_interval(self.step_interval_us) {
            return Err(Error::StepIntervalOutOfRange);
        }
        // Steps per revolution share the step interval bounds.
        if !is_valid_step_interval(self.steps_per_revolution) {
            return Err(Error::StepsPerRevolutionOutOfRange);
        }
        if self.pulse_width_us == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}
