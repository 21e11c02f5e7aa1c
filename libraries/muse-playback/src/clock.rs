//! Clock-style time formatting for UI display
//!
//! Converts a position or duration in seconds to `H:MM:SS` (hours emitted
//! only when nonzero) or `M:SS`. Media elements report `NaN` durations until
//! metadata arrives, so absent values collapse to the `0:00` placeholder.

/// Placeholder shown while no usable value is available
const ZERO_CLOCK: &str = "0:00";

/// Format seconds as a clock string.
///
/// Returns `"0:00"` exactly when the value is absent (NaN, infinite, zero,
/// or negative); otherwise the whole-second breakdown.
///
/// # Examples
///
/// ```
/// use muse_playback::format_clock;
///
/// assert_eq!(format_clock(f64::NAN), "0:00");
/// assert_eq!(format_clock(0.0), "0:00");
/// assert_eq!(format_clock(65.0), "1:05");
/// assert_eq!(format_clock(3725.0), "1:02:05");
/// ```
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return ZERO_CLOCK.to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
