//! Shared utility functions.

use chrono::{DateTime, Utc};

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Milliseconds in one day, the canonical bucket length.
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Largest supported bucket length: the distance in milliseconds from the
/// earliest time `chrono` can represent to the Unix epoch. Any longer window
/// would start the bucket of a pre-1970 event before that earliest time.
pub fn max_window_length_ms() -> u64 {
    DateTime::<Utc>::MIN_UTC.timestamp_millis().unsigned_abs()
}

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Converts a millisecond duration to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// Formats a millisecond duration as hours with the given precision.
pub fn format_hours(ms: u64, precision: usize) -> String {
    format!("{:.*} hours", precision, ms_to_hours(ms))
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
