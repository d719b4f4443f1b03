use embedded_hal::digital::PinState;

/// Logical rotation direction written to the DIR line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// DIR held high.
    #[default]
    Forward,
    /// DIR held low.
    Reverse,
}

impl Direction {
    /// Direction selected by the controller's reverse flag.
    #[must_use]
    pub const fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Reverse } else { Self::Forward }
    }

    #[must_use]
    pub const fn level(self) -> PinState {
        match self {
            Self::Forward => PinState::High,
            Self::Reverse => PinState::Low,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "MC_DIR_FWD",
            Self::Reverse => "MC_DIR_REV",
        }
    }
}
