#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidMicrostepMode,
    StepIntervalOutOfRange,
    StepsPerRevolutionOutOfRange,
    InvalidSpeed,
    InvalidConfig,
    Pin,
    Timer,
}

impl Error {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidMicrostepMode => "Invalid microstep mode",
            Self::StepIntervalOutOfRange => "Step interval out of range",
            Self::StepsPerRevolutionOutOfRange => "Steps per revolution out of range",
            Self::InvalidSpeed => "Invalid speed",
            Self::InvalidConfig => "Invalid configuration",
            Self::Pin => "Pin write failed",
            Self::Timer => "Timer arm failed",
        }
    }

    /// Validation errors leave the controller untouched; hardware errors may not.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        !matches!(self, Self::Pin | Self::Timer)
    }
}
