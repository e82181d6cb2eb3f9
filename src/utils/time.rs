use std::time::Duration;

use chrono::{DateTime, Local};

/// Formats elapsed whole seconds as `HH:MM:SS`. Hours are not wrapped, so a long session shows
/// `100:00:00` rather than rolling over.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// This is the standard way of showing a moment to the user in activitybeat.
pub fn format_local_time(moment: DateTime<Local>) -> String {
    moment.format("%H:%M:%S").to_string()
}
