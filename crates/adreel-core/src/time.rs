//! Second-based time helpers.
//!
//! The engine works in `f64` seconds throughout: clip durations come from the
//! generation service as reported seconds, and all derived quantities (trimmed
//! spans, speed-scaled durations, cumulative offsets) are recomputed from
//! source values rather than integrated, so no drift accumulates.

/// Tolerance for comparing derived time values.
///
/// Cumulative offsets are sums of a handful of f64 terms; anything closer
/// than this is considered the same instant.
pub const TIME_TOLERANCE: f64 = 1e-9;

/// Compare two time values within [`TIME_TOLERANCE`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_TOLERANCE
}

/// Format a time in seconds as `m:ss.mmm` (or `h:mm:ss.mmm` past an hour).
///
/// Used by the UI layer for the transport readout and progress indicator.
pub fn format_timecode(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_millis = (seconds * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{millis:03}")
    } else {
        format!("{mins}:{secs:02}.{millis:03}")
    }
}
