//! Formatting of elapsed times for immediate output.

use std::time::Duration;

/// Formats an elapsed time in milliseconds for human consumption.
///
/// Times under one millisecond render with three decimal places, times under
/// one second with two, and anything longer is converted to seconds:
///
/// ```
/// use timebudget::ms_format;
///
/// assert_eq!(ms_format(0.5), "0.500ms");
/// assert_eq!(ms_format(5.0), "5.00ms");
/// assert_eq!(ms_format(1500.0), "1.500sec");
/// ```
///
/// A negative elapsed time is a programming error on the caller's side, not a
/// runtime condition this function recovers from.
#[must_use]
pub fn ms_format(milliseconds: f64) -> String {
    debug_assert!(milliseconds >= 0.0, "elapsed time cannot be negative");

    if milliseconds < 1.0 {
        format!("{milliseconds:.3}ms")
    } else if milliseconds < 1000.0 {
        format!("{milliseconds:.2}ms")
    } else {
        format!("{:.3}sec", milliseconds / 1000.0)
    }
}

/// Converts a duration to fractional milliseconds.
pub(crate) fn duration_as_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
