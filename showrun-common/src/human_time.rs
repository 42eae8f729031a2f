//! Human-readable time formatting
//!
//! Countdown values are shown as `HH:MM:SS`, with a leading `-` once a cue
//! runs into overtime. Partial seconds round away from zero so a display never
//! reads `00:00:00` while time is still left on the clock.

/// Format a countdown value in milliseconds as `HH:MM:SS`
///
/// # Examples
///
/// ```
/// use showrun_common::human_time::format_timer;
///
/// assert_eq!(format_timer(0), "00:00:00");
/// assert_eq!(format_timer(61_000), "00:01:01");
/// assert_eq!(format_timer(400), "00:00:01");
/// assert_eq!(format_timer(-90_000), "-00:01:30");
/// assert_eq!(format_timer(36_000_000), "10:00:00");
/// ```
pub fn format_timer(millis: i64) -> String {
    let is_negative = millis < 0;
    let abs_millis = millis.unsigned_abs();
    let total_seconds = abs_millis.div_ceil(1000);

    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    let formatted = format!("{:02}:{:02}:{:02}", hours, mins, secs);
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format an optional countdown; `None` renders as `--:--:--`
pub fn format_timer_opt(millis: Option<i64>) -> String {
    match millis {
        Some(ms) => format_timer(ms),
        None => "--:--:--".to_string(),
    }
}

/// Format milliseconds since midnight as a wall-clock `HH:MM:SS.mmm`
///
/// Used for log lines, where sub-second precision matters.
///
/// ```
/// use showrun_common::human_time::format_time_of_day;
///
/// assert_eq!(format_time_of_day(66_600_000), "18:30:00.000");
/// assert_eq!(format_time_of_day(86_400_000 + 1_500), "00:00:01.500");
/// ```
pub fn format_time_of_day(millis: i64) -> String {
    let millis = crate::time::wrap_day(millis);
    let hours = millis / 3_600_000;
    let mins = (millis % 3_600_000) / 60_000;
    let secs = (millis % 60_000) / 1000;
    let ms = millis % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}
