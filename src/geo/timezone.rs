//! Timezone handling for locations.
//!
//! Every date construction in vakit goes through this module with an explicit
//! [`Tz`]; nothing reads the system's local timezone.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone identifier such as `Europe/Istanbul`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("Unknown timezone identifier: {}", name))
}

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to UTC for coordinates tzf-rs cannot resolve to a named zone
/// (open ocean, poles).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    use std::sync::OnceLock;
    use tzf_rs::DefaultFinder;

    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs uses (longitude, latitude) order
    let tz_name = finder.get_tz_name(longitude, latitude);
    tz_name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// UTC offset in seconds in force on the given local calendar day.
///
/// Sampled at local noon, so DST switches (which happen at night) never leak
/// the neighbouring day's offset into this one.
pub fn utc_offset_seconds(tz: &Tz, date: NaiveDate) -> i32 {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.offset().fix().local_minus_utc())
        .unwrap_or_else(|| tz.offset_from_utc_datetime(&noon).fix().local_minus_utc())
}

/// Interpret a wall-clock date and time in `tz` as an absolute instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) are read with the offset in force
/// just before the gap.
pub fn local_instant(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            // A day earlier is safely before the gap
            let before_gap = naive - chrono::Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before_gap).fix().local_minus_utc();
            Utc.from_utc_datetime(&(naive - chrono::Duration::seconds(offset as i64)))
        }
    }
}

/// Human-readable label such as `Europe/Istanbul (UTC+03:00)`.
pub fn timezone_label(tz: &Tz, at: DateTime<Utc>) -> String {
    let offset = at.with_timezone(tz).offset().fix().local_minus_utc();
    format!("{} (UTC{})", tz.name(), format_offset(offset))
}

/// Format a UTC offset in seconds as `+HH:MM` / `-HH:MM`.
pub fn format_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}
