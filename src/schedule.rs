//! Prayer schedule derivation and the rolling previous/next timeline.
//!
//! This module turns a location's sunrise and sunset into the six daily prayer
//! instants and answers "which prayer was last, which comes next" for any
//! instant. All functions are pure: the current time is always passed in by
//! the caller, nothing is cached, and the engine can be shared freely between
//! threads.
//!
//! ## Key Functionality
//! - **Daily entries**: fixed offsets around sunrise, sunset and solar midday
//! - **Polar fallback**: a fixed wall-clock schedule when the sun never rises
//!   or never sets, flagged on the returned [`DailySchedule`]
//! - **Timeline**: a three-day window (yesterday, today, tomorrow) so the
//!   previous/next pair is correct across local midnight

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::constants::*;
use crate::geo::timezone::local_instant;
use crate::geo::{GeoLocation, NoSolution, SolarEvents, calculate_solar_events};
use crate::prayer::{DailySchedule, PrayerInstant, PrayerKind, Timeline};

/// Empirical offsets applied to the solar events.
///
/// The defaults reproduce the reference schedule exactly; overrides come from
/// the `[schedule]` table of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleParams {
    pub fajr_offset: chrono::Duration,
    pub isha_offset: chrono::Duration,
    pub asr_min_gap: chrono::Duration,
    pub asr_ratio: f64,
    pub asr_sunset_margin: chrono::Duration,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            fajr_offset: chrono::Duration::minutes(DEFAULT_FAJR_OFFSET_MINUTES),
            isha_offset: chrono::Duration::minutes(DEFAULT_ISHA_OFFSET_MINUTES),
            asr_min_gap: chrono::Duration::minutes(DEFAULT_ASR_MIN_GAP_MINUTES),
            asr_ratio: DEFAULT_ASR_RATIO,
            asr_sunset_margin: chrono::Duration::minutes(DEFAULT_ASR_SUNSET_MARGIN_MINUTES),
        }
    }
}

/// Computes daily prayer schedules and timelines for any location.
#[derive(Debug, Clone, Default)]
pub struct PrayerScheduleEngine {
    params: ScheduleParams,
}

impl PrayerScheduleEngine {
    pub fn new(params: ScheduleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScheduleParams {
        &self.params
    }

    /// The six prayers of `date` (a calendar day in the location's timezone).
    ///
    /// Always returns six entries sorted by timestamp. When the sunrise
    /// equation has no solution for this latitude and day, the fixed fallback
    /// schedule is returned with `used_fallback` set.
    pub fn entries_for_day(&self, location: &GeoLocation, date: NaiveDate) -> DailySchedule {
        match calculate_solar_events(location, date) {
            Ok(events) => DailySchedule {
                date,
                entries: self.solar_entries(&events),
                used_fallback: false,
            },
            Err(NoSolution { .. }) => DailySchedule {
                date,
                entries: fallback_entries(location, date),
                used_fallback: true,
            },
        }
    }

    /// Previous and next prayer relative to `now`.
    ///
    /// `next` is the first prayer strictly after `now`, so a prayer whose
    /// instant equals `now` is reported as `previous`.
    pub fn timeline(&self, location: &GeoLocation, now: DateTime<Utc>) -> Timeline {
        let today = now.with_timezone(&location.timezone()).date_naive();
        let today_schedule = self.entries_for_day(location, today);

        let mut window: Vec<PrayerInstant> = Vec::with_capacity(18);
        if let Some(yesterday) = today.pred_opt() {
            window.extend(self.entries_for_day(location, yesterday).entries);
        }
        window.extend(today_schedule.entries.iter().copied());
        if let Some(tomorrow) = today.succ_opt() {
            window.extend(self.entries_for_day(location, tomorrow).entries);
        }
        window.sort_by_key(|entry| entry.timestamp);

        match window.iter().position(|entry| entry.timestamp > now) {
            Some(next_index) => Timeline {
                previous: window[next_index.saturating_sub(1)],
                next: window[next_index],
            },
            None => {
                let entries = &today_schedule.entries;
                Timeline {
                    previous: entries[entries.len() - 2],
                    next: entries[entries.len() - 1],
                }
            }
        }
    }

    fn solar_entries(&self, events: &SolarEvents) -> Vec<PrayerInstant> {
        let params = &self.params;
        let SolarEvents { sunrise, sunset } = *events;

        let midday = sunrise + (sunset - sunrise) / 2;
        let afternoon_span = scale_duration(sunset - midday, params.asr_ratio);
        let afternoon_candidate = midday + params.asr_min_gap.max(afternoon_span);
        let asr = afternoon_candidate.min(sunset - params.asr_sunset_margin);

        let mut entries = vec![
            PrayerInstant::new(PrayerKind::Fajr, sunrise - params.fajr_offset),
            PrayerInstant::new(PrayerKind::Sunrise, sunrise),
            PrayerInstant::new(PrayerKind::Dhuhr, midday),
            PrayerInstant::new(PrayerKind::Asr, asr),
            PrayerInstant::new(PrayerKind::Maghrib, sunset),
            PrayerInstant::new(PrayerKind::Isha, sunset + params.isha_offset),
        ];
        entries.sort_by_key(|entry| entry.timestamp);
        entries
    }
}

/// Fixed wall-clock schedule for days without sunrise or sunset.
fn fallback_entries(location: &GeoLocation, date: NaiveDate) -> Vec<PrayerInstant> {
    let tz = location.timezone();
    let clock = [
        (PrayerKind::Fajr, FALLBACK_FAJR),
        (PrayerKind::Sunrise, FALLBACK_SUNRISE),
        (PrayerKind::Dhuhr, FALLBACK_DHUHR),
        (PrayerKind::Asr, FALLBACK_ASR),
        (PrayerKind::Maghrib, FALLBACK_MAGHRIB),
        (PrayerKind::Isha, FALLBACK_ISHA),
    ];

    let mut entries: Vec<PrayerInstant> = clock
        .into_iter()
        .map(|(kind, (hour, minute))| {
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
            PrayerInstant::new(kind, local_instant(&tz, date.and_time(time)))
        })
        .collect();
    entries.sort_by_key(|entry| entry.timestamp);
    entries
}

/// Multiply a duration by a real factor at millisecond precision.
fn scale_duration(duration: chrono::Duration, factor: f64) -> chrono::Duration {
    chrono::Duration::milliseconds((duration.num_milliseconds() as f64 * factor).round() as i64)
}
