//! Clock formatting and cycle-time arithmetic.

use crate::numbers::floor_f64_to_i64;

/// Upper bound callers must clamp a single tick delta to, in seconds.
///
/// The engine assumes at most one countdown crossing per tick; a stalled
/// caller delivering one huge delta would otherwise swallow crossings.
pub const MAX_TICK_SECONDS: f64 = 0.05;

/// Countdown length for one shape cycle.
///
/// Auto-switch runs on a faster cadence than the full round duration but
/// never exceeds it; a zero cadence disables auto-switch entirely.
#[must_use]
pub fn cycle_time(duration_seconds: f64, auto_switch_seconds: f64) -> f64 {
    if auto_switch_seconds > 0.0 {
        auto_switch_seconds.min(duration_seconds)
    } else {
        duration_seconds
    }
}

/// Format seconds as a two-digit "MM:SS" clock, clamping negatives to zero.
#[must_use]
pub fn format_clock(total_seconds: f64) -> String {
    let clamped = floor_f64_to_i64(total_seconds).max(0);
    let minutes = clamped / 60;
    let seconds = clamped % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Human-readable short duration: "30s", "1m", "1m 15s".
#[must_use]
pub fn format_short_duration(total_seconds: f64) -> String {
    let value = floor_f64_to_i64(total_seconds);
    if value < 60 {
        return format!("{value}s");
    }
    let minutes = value / 60;
    let seconds = value % 60;
    if seconds == 0 {
        format!("{minutes}m")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_time_respects_auto_switch_cadence() {
        assert!((cycle_time(60.0, 15.0) - 15.0).abs() < f64::EPSILON);
        assert!((cycle_time(60.0, 0.0) - 60.0).abs() < f64::EPSILON);
        assert!((cycle_time(10.0, 45.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clock_renders_mm_ss_and_clamps_negatives() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(65.0), "01:05");
        assert_eq!(format_clock(-10.0), "00:00");
        assert_eq!(format_clock(59.9), "00:59");
    }

    #[test]
    fn short_duration_renders_readably() {
        assert_eq!(format_short_duration(30.0), "30s");
        assert_eq!(format_short_duration(60.0), "1m");
        assert_eq!(format_short_duration(75.0), "1m 15s");
        assert_eq!(format_short_duration(0.0), "0s");
    }
}
