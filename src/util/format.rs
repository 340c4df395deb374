//! Formatting and parsing utilities
//!
//! Timer display, elapsed time, and time-limit parsing for the CLI.

use std::time::Duration;

/// Format seconds as a zero-padded `HH:MM:SS` clock
///
/// # Examples
/// ```
/// use exani::util::format::format_hms;
///
/// assert_eq!(format_hms(0), "00:00:00");
/// assert_eq!(format_hms(3725), "01:02:05");
/// ```
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format an elapsed duration for people, dropping sub-second precision
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use exani::util::format::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(90_400)), "1m 30s");
/// ```
pub fn format_elapsed(duration: Duration) -> String {
    let whole = Duration::from_secs(duration.as_secs());
    if whole.is_zero() {
        return "0s".to_string();
    }
    humantime::format_duration(whole).to_string()
}

/// Parse a time limit into whole minutes.
///
/// Accepts a bare number of minutes (`"90"`) or a duration such as
/// `"1h 30m"`. Durations must be a whole, non-zero number of minutes.
pub fn parse_time_limit(input: &str) -> Result<u32, String> {
    let input = input.trim();

    if let Ok(minutes) = input.parse::<u32>() {
        return if minutes == 0 {
            Err("Time limit must be at least 1 minute".to_string())
        } else {
            Ok(minutes)
        };
    }

    let duration = humantime::parse_duration(input)
        .map_err(|e| format!("Invalid time limit '{}': {}", input, e))?;

    let secs = duration.as_secs();
    if secs == 0 || secs % 60 != 0 || duration.subsec_nanos() != 0 {
        return Err(format!(
            "Time limit must be a whole number of minutes: {}",
            input
        ));
    }

    u32::try_from(secs / 60).map_err(|_| format!("Time limit too large: {}", input))
}

/// Fraction of progress through the exam, for gauges
pub fn progress_ratio(position: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (position as f64 / total as f64).clamp(0.0, 1.0)
    }
}
