use embedded_hal::digital::PinState;

use crate::Error;

/// Microstep resolution selected through the MS1/MS2/MS3 lines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum MicrostepMode {
    #[default]
    Full = 0,
    Half = 1,
    Quarter = 2,
    Eighth = 3,
    Sixteenth = 4,
}

impl MicrostepMode {
    /// Every mode, finest resolution last.
    pub const ALL: [Self; 5] = [
        Self::Full,
        Self::Half,
        Self::Quarter,
        Self::Eighth,
        Self::Sixteenth,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Half => "HALF",
            Self::Quarter => "QUARTER",
            Self::Eighth => "EIGHTH",
            Self::Sixteenth => "SIXTEENTH",
        }
    }

    /// Micro-steps per full step.
    #[must_use]
    pub const fn microsteps(self) -> u32 {
        match self {
            Self::Full => 1,
            Self::Half => 2,
            Self::Quarter => 4,
            Self::Eighth => 8,
            Self::Sixteenth => 16,
        }
    }

    /// `(MS1, MS2, MS3)` as `true` = high.
    ///
    /// This is the A4988 truth table. DRV8825 uses the same lines but maps
    /// the upper codes to finer resolutions.
    #[must_use]
    pub const fn pattern(self) -> (bool, bool, bool) {
        match self {
            Self::Full => (false, false, false),
            Self::Half => (true, false, false),
            Self::Quarter => (false, true, false),
            Self::Eighth => (true, true, false),
            Self::Sixteenth => (true, true, true),
        }
    }

    /// Pattern as pin levels, in `(MS1, MS2, MS3)` order.
    #[must_use]
    pub fn levels(self) -> [PinState; 3] {
        let (ms1, ms2, ms3) = self.pattern();
        [ms1.into(), ms2.into(), ms3.into()]
    }
}

impl TryFrom<u8> for MicrostepMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Full),
            1 => Ok(Self::Half),
            2 => Ok(Self::Quarter),
            3 => Ok(Self::Eighth),
            4 => Ok(Self::Sixteenth),
            _ => Err(Error::InvalidMicrostepMode),
        }
    }
}
