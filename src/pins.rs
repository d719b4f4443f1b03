//! The eight control lines of a step/dir driver and the GPIO seam used to drive them.

use embedded_hal::digital::{OutputPin, PinState};

/// Logical driver lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriverPin {
    Dir,
    Step,
    Sleep,
    Reset,
    Ms1,
    Ms2,
    Ms3,
    Enable,
}

impl DriverPin {
    /// Configuration order used by `begin`.
    pub const ALL: [Self; 8] = [
        Self::Dir,
        Self::Step,
        Self::Ms1,
        Self::Ms2,
        Self::Ms3,
        Self::Sleep,
        Self::Reset,
        Self::Enable,
    ];

    /// Microstep selector lines, `(MS1, MS2, MS3)`.
    pub const MICROSTEP: [Self; 3] = [Self::Ms1, Self::Ms2, Self::Ms3];

    /// Board pin number on the reference wiring.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Dir => 2,
            Self::Step => 3,
            Self::Sleep => 4,
            Self::Reset => 5,
            Self::Ms3 => 6,
            Self::Ms2 => 7,
            Self::Ms1 => 8,
            Self::Enable => 9,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dir => "DIR",
            Self::Step => "STEP",
            Self::Sleep => "SLEEP",
            Self::Reset => "RESET",
            Self::Ms1 => "MS1",
            Self::Ms2 => "MS2",
            Self::Ms3 => "MS3",
            Self::Enable => "ENABLE",
        }
    }
}

/// GPIO access for the driver lines.
///
/// Implement this directly for HALs that address pins by number, or use
/// [`PinSet`] to wrap eight `embedded-hal` output pins.
pub trait DriverPins {
    type Error;

    /// Make `pin` an output and drive it to `initial`.
    fn configure_output(&mut self, pin: DriverPin, initial: PinState) -> Result<(), Self::Error>;

    fn write(&mut self, pin: DriverPin, level: PinState) -> Result<(), Self::Error>;
}

/// Eight `embedded-hal` output pins, one per driver line.
///
/// The HAL has already put the pins in output mode, so `configure_output`
/// only sets the initial level.
#[derive(Debug)]
pub struct PinSet<P> {
    pub dir: P,
    pub step: P,
    pub sleep: P,
    pub reset: P,
    pub ms1: P,
    pub ms2: P,
    pub ms3: P,
    pub enable: P,
}

impl<P: OutputPin> PinSet<P> {
    fn pin_mut(&mut self, pin: DriverPin) -> &mut P {
        match pin {
            DriverPin::Dir => &mut self.dir,
            DriverPin::Step => &mut self.step,
            DriverPin::Sleep => &mut self.sleep,
            DriverPin::Reset => &mut self.reset,
            DriverPin::Ms1 => &mut self.ms1,
            DriverPin::Ms2 => &mut self.ms2,
            DriverPin::Ms3 => &mut self.ms3,
            DriverPin::Enable => &mut self.enable,
        }
    }
}

impl<P: OutputPin> DriverPins for PinSet<P> {
    type Error = P::Error;

    fn configure_output(&mut self, pin: DriverPin, initial: PinState) -> Result<(), Self::Error> {
        self.pin_mut(pin).set_state(initial)
    }

    fn write(&mut self, pin: DriverPin, level: PinState) -> Result<(), Self::Error> {
        self.pin_mut(pin).set_state(level)
    }
}
