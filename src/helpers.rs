/// Microseconds in one minute.
pub const MICROS_PER_MINUTE: u32 = 60_000_000;

/// Shortest accepted step interval in microseconds.
pub const MIN_STEP_INTERVAL_US: u32 = 2;
/// Longest accepted step interval in microseconds (1 RPM at 200 steps/rev).
pub const MAX_STEP_INTERVAL_US: u32 = 300_000;

/// Standard full steps per revolution for a 1.8° motor.
pub const DEFAULT_STEPS_PER_REV: u32 = 200;

/// Nominal high time of a step pulse in microseconds.
pub const STEP_PULSE_WIDTH_US: u32 = 4;

/// Returns `true` if `interval_us` lies within the accepted step interval range.
#[must_use]
pub const fn is_valid_step_interval(interval_us: u32) -> bool {
    interval_us >= MIN_STEP_INTERVAL_US && interval_us <= MAX_STEP_INTERVAL_US
}

/// Microseconds per full step for the requested speed.
///
/// Integer division, truncating. Returns `None` when `rpm` or `steps_per_rev`
/// is zero. The result is not range checked.
#[must_use]
pub fn rpm_to_step_interval(rpm: u32, steps_per_rev: u32) -> Option<u32> {
    let steps_per_minute = u64::from(rpm) * u64::from(steps_per_rev);
    if steps_per_minute == 0 {
        return None;
    }
    u32::try_from(u64::from(MICROS_PER_MINUTE) / steps_per_minute).ok()
}

/// Speed in RPM produced by stepping every `interval_us`.
#[must_use]
pub const fn step_interval_to_rpm(interval_us: u32, steps_per_rev: u32) -> u32 {
    if interval_us == 0 || steps_per_rev == 0 {
        return 0;
    }
    MICROS_PER_MINUTE / steps_per_rev / interval_us
}

/// Microseconds between micro-step pulses for a speed at a given microstep resolution.
#[must_use]
pub const fn step_pulse_interval(steps_per_rev: u32, microsteps: u32, rpm: u32) -> Option<u32> {
    if steps_per_rev == 0 || microsteps == 0 || rpm == 0 {
        return None;
    }
    Some(MICROS_PER_MINUTE / steps_per_rev / microsteps / rpm)
}

/// High time for a step pulse that still fits inside `interval_us`.
///
/// Never more than half the interval, never less than 1 µs.
#[must_use]
pub fn pulse_width_for(interval_us: u32, requested_us: u32) -> u32 {
    requested_us.min(interval_us / 2).max(1)
}
