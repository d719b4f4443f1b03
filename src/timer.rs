/// A hardware timer that fires periodically.
///
/// Each firing must call [`StepperController::on_tick`](crate::StepperController::on_tick)
/// exactly once, usually through [`SharedStepper::on_interrupt`](crate::SharedStepper::on_interrupt)
/// from the timer's interrupt handler.
pub trait PeriodicTimer {
    type Error;

    /// Start firing every `interval_us` microseconds, replacing any previous schedule.
    fn arm(&mut self, interval_us: u32) -> Result<(), Self::Error>;
}
