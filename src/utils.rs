//! Utility functions shared across the codebase.
//!
//! Formatting helpers for clock times, countdowns and paths.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

use crate::constants::{CLOCK_FORMAT_12H, CLOCK_FORMAT_24H};

/// Clock style for displayed prayer times.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => CLOCK_FORMAT_24H,
            TimeFormat::TwelveHour => CLOCK_FORMAT_12H,
        }
    }
}

/// Render an instant as wall-clock time in `tz`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use vakit::utils::{TimeFormat, format_clock};
/// let instant = Utc.with_ymd_and_hms(2024, 6, 21, 17, 39, 0).unwrap();
/// assert_eq!(format_clock(instant, chrono_tz::Europe::Istanbul, TimeFormat::TwentyFourHour), "20:39");
/// assert_eq!(format_clock(instant, chrono_tz::Europe::Istanbul, TimeFormat::TwelveHour), "08:39 PM");
/// ```
pub fn format_clock(instant: DateTime<Utc>, tz: Tz, format: TimeFormat) -> String {
    instant.with_timezone(&tz).format(format.pattern()).to_string()
}

/// Render a countdown as `HH:MM:SS`; negative durations render as zero.
///
/// # Examples
/// ```
/// use vakit::utils::format_countdown;
/// assert_eq!(format_countdown(chrono::Duration::seconds(3725)), "01:02:05");
/// assert_eq!(format_countdown(chrono::Duration::seconds(-5)), "00:00:00");
/// ```
pub fn format_countdown(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Render a duration as `2h 05m`, or `45m` under an hour.
pub fn format_duration_short(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Convert an absolute path to use ~ notation if it's in the user's home directory.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
