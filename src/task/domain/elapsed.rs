//! `HH:MM:SS` formatting for time spent on a task.

use chrono::TimeDelta;

/// Formatted value for empty, negative, or corrupt durations.
pub const ZERO_ELAPSED: &str = "00:00:00";

/// Largest millisecond count accepted from floating clock sources (`2^53 - 1`).
pub const MAX_SAFE_MILLIS: f64 = 9_007_199_254_740_991.0;

const MILLIS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Formats a millisecond count from a possibly skewed clock as `HH:MM:SS`.
///
/// Negative, non-finite, and out-of-range inputs format as
/// [`ZERO_ELAPSED`]. Hours are padded to two digits but never truncated.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "input is range-checked to [0, 2^53) before the cast"
)]
pub fn format_elapsed_ms(milliseconds: f64) -> String {
    if !milliseconds.is_finite() || milliseconds < 0.0 || milliseconds > MAX_SAFE_MILLIS {
        return ZERO_ELAPSED.to_owned();
    }
    format_whole_millis(milliseconds.floor() as u64)
}

/// Formats an elapsed [`TimeDelta`] as `HH:MM:SS`.
///
/// Negative deltas, which arise from client/server clock skew, format as
/// [`ZERO_ELAPSED`].
#[must_use]
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    u64::try_from(elapsed.num_milliseconds())
        .map_or_else(|_| ZERO_ELAPSED.to_owned(), format_whole_millis)
}

fn format_whole_millis(milliseconds: u64) -> String {
    let total_seconds = milliseconds.div_euclid(MILLIS_PER_SECOND);
    let hours = total_seconds.div_euclid(SECONDS_PER_HOUR);
    let minutes = total_seconds
        .rem_euclid(SECONDS_PER_HOUR)
        .div_euclid(SECONDS_PER_MINUTE);
    let seconds = total_seconds.rem_euclid(SECONDS_PER_MINUTE);
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
