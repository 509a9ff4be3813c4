//! Human-readable duration formatting.
//!
//! Durations render at second precision as `h`/`m`/`s` components with a
//! space between them: `45s`, `1m 30s`, `1h 0m 0s`. A unit only appears once
//! the duration reaches it, but every unit below the largest is always
//! printed, so a day log lines up column-wise.

use chrono::Duration;

/// Format a duration as `1h 15m 0s`, `30m 0s`, `45s`, or `0s`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
