//! Shared utilities for CLI commands.

use chrono::Duration;

/// Formats a duration as "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 0 {
        return "0m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Decimal hours rounded to two places.
#[allow(clippy::cast_precision_loss)]
pub fn decimal_hours(duration: Duration) -> f64 {
    (duration.num_minutes() as f64 / 60.0 * 100.0).round() / 100.0
}
