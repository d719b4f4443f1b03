//! Interrupt-safe home for a [`StepperController`].
//!
//! Place a [`SharedStepper`] in a `static`, install the controller once it has
//! been started, and call [`SharedStepper::on_interrupt`] from the timer ISR:
//!
//! ```ignore
//! static STEPPER: SharedStepper<Pins, StepTimer, Delay> = SharedStepper::new();
//!
//! #[interrupt]
//! fn TIM2() {
//!     STEPPER.on_interrupt();
//! }
//! ```

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use log::error;

use crate::{DriverPins, PeriodicTimer, StepperController};

pub struct SharedStepper<P, T, D> {
    inner: Mutex<RefCell<Option<StepperController<P, T, D>>>>,
}

impl<P, T, D> SharedStepper<P, T, D> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<P, T, D> Default for SharedStepper<P, T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T, D> fmt::Debug for SharedStepper<P, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStepper").finish_non_exhaustive()
    }
}

impl<P, T, D> SharedStepper<P, T, D>
where
    P: DriverPins,
    T: PeriodicTimer,
    D: DelayNs,
{
    /// Installs `controller`, returning the one it replaces.
    ///
    /// # Panics
    /// Panics if called from inside [`with`](Self::with).
    pub fn init(
        &self,
        controller: StepperController<P, T, D>,
    ) -> Option<StepperController<P, T, D>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(controller))
    }

    /// Removes the controller.
    ///
    /// # Panics
    /// Panics if called from inside [`with`](Self::with).
    pub fn take(&self) -> Option<StepperController<P, T, D>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Runs `f` on the controller with interrupts masked.
    ///
    /// Returns `None` if no controller is installed or it is already borrowed.
    pub fn with<R>(&self, f: impl FnOnce(&mut StepperController<P, T, D>) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow(cs).try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }

    /// Timer interrupt entry point. Returns `true` if a pulse was emitted.
    ///
    /// The pulse runs inside a critical section. A firing that arrives while
    /// the controller is already borrowed is dropped.
    pub fn on_interrupt(&self) -> bool {
        critical_section::with(|cs| {
            let Ok(mut slot) = self.inner.borrow(cs).try_borrow_mut() else {
                return false;
            };
            let Some(controller) = slot.as_mut() else {
                return false;
            };
            match controller.on_tick() {
                Ok(pulsed) => pulsed,
                Err(err) => {
                    error!("Step pulse failed: {}", err.as_str());
                    false
                }
            }
        })
    }
}
