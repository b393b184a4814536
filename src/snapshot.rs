//! Display snapshot combining the timeline with formatted values.
//!
//! A [`PrayerSnapshot`] is what display consumers (CLI output, widgets,
//! countdown views) read: the previous/next pair, today's schedule, and the
//! strings they would otherwise have to format themselves, all rendered in the
//! location's timezone.

use chrono::{DateTime, Utc};

use crate::geo::GeoLocation;
use crate::geo::timezone::timezone_label;
use crate::prayer::{DailySchedule, Language, PrayerInstant, Timeline};
use crate::schedule::PrayerScheduleEngine;
use crate::utils::{TimeFormat, format_clock, format_countdown};

/// Presentation settings for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub language: Language,
    pub time_format: TimeFormat,
}

/// One formatted row of the day's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub label: &'static str,
    pub time: String,
    pub instant: PrayerInstant,
}

/// Timeline, schedule and formatted strings at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSnapshot {
    pub location_name: String,
    pub timezone_label: String,
    /// Wall-clock time at the location when the snapshot was taken.
    pub local_time: String,
    pub timeline: Timeline,
    pub previous_label: &'static str,
    pub next_label: &'static str,
    pub next_time: String,
    /// Countdown to the next prayer, `HH:MM:SS`.
    pub remaining: String,
    pub progress: f32,
    pub schedule: DailySchedule,
    pub rows: Vec<ScheduleRow>,
    pub used_fallback: bool,
}

impl PrayerSnapshot {
    /// Compute a snapshot for `location` at `now`.
    pub fn capture(
        engine: &PrayerScheduleEngine,
        location: &GeoLocation,
        now: DateTime<Utc>,
        options: &DisplayOptions,
    ) -> Self {
        let tz = location.timezone();
        let today = now.with_timezone(&tz).date_naive();

        let timeline = engine.timeline(location, now);
        let schedule = engine.entries_for_day(location, today);

        let rows = schedule
            .iter()
            .map(|instant| ScheduleRow {
                label: instant.kind.label(options.language),
                time: format_clock(instant.timestamp, tz, options.time_format),
                instant: *instant,
            })
            .collect();

        Self {
            location_name: location.name().to_string(),
            timezone_label: timezone_label(&tz, now),
            local_time: format_clock(now, tz, options.time_format),
            previous_label: timeline.previous.kind.label(options.language),
            next_label: timeline.next.kind.label(options.language),
            next_time: format_clock(timeline.next.timestamp, tz, options.time_format),
            remaining: format_countdown(timeline.remaining(now)),
            progress: timeline.progress(now),
            used_fallback: schedule.used_fallback,
            timeline,
            schedule,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer::PrayerKind;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn istanbul() -> GeoLocation {
        GeoLocation::new("Istanbul", 41.0082, 28.9784, Tz::Europe__Istanbul).unwrap()
    }

    #[test]
    fn test_snapshot_fields() {
        let engine = PrayerScheduleEngine::default();
        let location = istanbul();
        let now = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap(); // 15:00 local

        let snapshot = PrayerSnapshot::capture(&engine, &location, now, &DisplayOptions::default());

        assert_eq!(snapshot.location_name, "Istanbul");
        assert_eq!(snapshot.timezone_label, "Europe/Istanbul (UTC+03:00)");
        assert_eq!(snapshot.local_time, "15:00");
        assert_eq!(snapshot.timeline.previous.kind, PrayerKind::Dhuhr);
        assert_eq!(snapshot.timeline.next.kind, PrayerKind::Asr);
        assert_eq!(snapshot.previous_label, "Öğle");
        assert_eq!(snapshot.next_label, "İkindi");
        assert_eq!(snapshot.rows.len(), 6);
        assert!(!snapshot.used_fallback);

        let expected = format_countdown(snapshot.timeline.next.timestamp - now);
        assert_eq!(snapshot.remaining, expected);
        assert!(snapshot.progress > 0.0 && snapshot.progress < 1.0);
    }

    #[test]
    fn test_snapshot_english_twelve_hour() {
        let engine = PrayerScheduleEngine::default();
        let location = istanbul();
        let now = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        let options = DisplayOptions {
            language: Language::English,
            time_format: TimeFormat::TwelveHour,
        };

        let snapshot = PrayerSnapshot::capture(&engine, &location, now, &options);
        assert_eq!(snapshot.local_time, "03:00 PM");
        assert_eq!(snapshot.next_label, "Asr");
        assert_eq!(snapshot.rows[0].label, "Fajr");
        assert!(snapshot.rows[0].time.ends_with("AM"));
    }

    #[test]
    fn test_snapshot_reports_fallback() {
        let engine = PrayerScheduleEngine::default();
        let location = GeoLocation::new("Pole", 85.0, 0.0, Tz::UTC).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap();

        let snapshot = PrayerSnapshot::capture(&engine, &location, now, &DisplayOptions::default());
        assert!(snapshot.used_fallback);
        let times: Vec<&str> = snapshot.rows.iter().map(|row| row.time.as_str()).collect();
        assert_eq!(times, ["05:30", "07:00", "12:55", "16:20", "19:05", "20:30"]);
        assert_eq!(snapshot.next_time, "12:55");
        assert_eq!(snapshot.remaining, "02:55:00");
    }
}
