//! Sunrise and sunset instants from the almanac sunrise equation.
//!
//! This module implements the day-of-year based sunrise equation (the
//! "Almanac for Computers" approximation): a handful of trigonometric steps
//! give the UTC hour of sunrise or sunset for a latitude/longitude, accurate to
//! a minute or two, which is plenty for civil prayer times. Near the poles in
//! summer or winter the equation has no solution; that case is reported as a
//! typed [`NoSolution`] value and handled by the caller.
//!
//! The UTC hour is turned into an absolute instant using the location's own
//! timezone for the requested local calendar day, so DST changes are picked
//! up per day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;

use crate::constants::*;
use crate::geo::GeoLocation;
use crate::geo::timezone::{local_instant, utc_offset_seconds};

/// Which horizon crossing to solve for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl SolarEvent {
    /// Local mean time used as the first approximation of the event.
    fn approx_hour(self) -> f64 {
        match self {
            SolarEvent::Sunrise => APPROX_SUNRISE_HOUR,
            SolarEvent::Sunset => APPROX_SUNSET_HOUR,
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolarEvent::Sunrise => write!(f, "rise"),
            SolarEvent::Sunset => write!(f, "set"),
        }
    }
}

/// The sun does not cross the horizon on this day at this latitude.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("the sun does not {event} at latitude {latitude:.4}° on day {day_of_year} of the year")]
pub struct NoSolution {
    pub event: SolarEvent,
    pub latitude: f64,
    pub day_of_year: u32,
}

/// Sunrise and sunset instants for one location and local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarEvents {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// 1-based day of the year of a local calendar date.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Wrap an hour value into [0, 24).
pub fn normalize_hours(hours: f64) -> f64 {
    hours.rem_euclid(24.0)
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

/// Solve the sunrise equation for one event.
///
/// # Arguments
/// * `latitude` - Geographic latitude in degrees (-90 to +90)
/// * `longitude` - Geographic longitude in degrees (-180 to +180)
/// * `day_of_year` - 1-based day of the year, counted in the location's timezone
/// * `event` - Sunrise or sunset
///
/// # Returns
/// * `Ok(hour)` - UTC hour of day of the event, in [0, 24)
/// * `Err(NoSolution)` - The sun stays above or below the horizon all day
pub fn solar_event_utc_hour(
    latitude: f64,
    longitude: f64,
    day_of_year: u32,
    event: SolarEvent,
) -> Result<f64, NoSolution> {
    let lng_hour = longitude / 15.0;
    let approx_time = day_of_year as f64 + (event.approx_hour() - lng_hour) / 24.0;

    let mean_anomaly = MEAN_ANOMALY_RATE * approx_time - MEAN_ANOMALY_OFFSET;

    let true_longitude = normalize_degrees(
        mean_anomaly
            + EQUATION_OF_CENTER_1 * sin_deg(mean_anomaly)
            + EQUATION_OF_CENTER_2 * sin_deg(2.0 * mean_anomaly)
            + PERIHELION_LONGITUDE,
    );

    // Right ascension must sit in the same quadrant as the true longitude
    let mut right_ascension =
        normalize_degrees((OBLIQUITY_TAN_FACTOR * tan_deg(true_longitude)).atan().to_degrees());
    let longitude_quadrant = (true_longitude / 90.0).floor() * 90.0;
    let ascension_quadrant = (right_ascension / 90.0).floor() * 90.0;
    right_ascension += longitude_quadrant - ascension_quadrant;
    let right_ascension_hours = right_ascension / 15.0;

    let sin_declination = OBLIQUITY_SIN_FACTOR * sin_deg(true_longitude);
    let cos_declination = sin_declination.asin().cos();

    let cos_hour_angle = (cos_deg(SUN_ZENITH_DEGREES) - sin_declination * sin_deg(latitude))
        / (cos_declination * cos_deg(latitude));

    if !cos_hour_angle.is_finite() || !(-1.0..=1.0).contains(&cos_hour_angle) {
        return Err(NoSolution {
            event,
            latitude,
            day_of_year,
        });
    }

    let hour_angle_degrees = match event {
        SolarEvent::Sunrise => 360.0 - cos_hour_angle.acos().to_degrees(),
        SolarEvent::Sunset => cos_hour_angle.acos().to_degrees(),
    };
    let hour_angle = hour_angle_degrees / 15.0;

    let local_mean_time =
        hour_angle + right_ascension_hours - SIDEREAL_DRIFT * approx_time - LOCAL_MEAN_TIME_OFFSET;

    Ok(normalize_hours(local_mean_time - lng_hour))
}

/// Calculate sunrise and sunset instants for a location on a local calendar day.
///
/// Fails with [`NoSolution`] if either event does not happen that day.
pub fn calculate_solar_events(
    location: &GeoLocation,
    date: NaiveDate,
) -> Result<SolarEvents, NoSolution> {
    let day = day_of_year(date);
    let (latitude, longitude) = (location.latitude(), location.longitude());

    let sunrise_hour = solar_event_utc_hour(latitude, longitude, day, SolarEvent::Sunrise)?;
    let sunset_hour = solar_event_utc_hour(latitude, longitude, day, SolarEvent::Sunset)?;

    let tz = location.timezone();
    Ok(SolarEvents {
        sunrise: event_instant(&tz, longitude, date, sunrise_hour, SolarEvent::Sunrise),
        sunset: event_instant(&tz, longitude, date, sunset_hour, SolarEvent::Sunset),
    })
}

/// Turn a UTC hour of day into an absolute instant near the requested local day.
///
/// The UTC hour carries no date. Adding the day's UTC offset gives a local
/// seconds-of-day value that may fall outside [0, 86400); it is shifted by
/// whole days so it lands within twelve hours of the equation's own
/// approximation of the event, and the overflow moves the calendar date.
/// The approximation is taken in zone time, with the zone's distance from
/// local mean time reduced to at most twelve hours either way.
fn event_instant(
    tz: &Tz,
    longitude: f64,
    date: NaiveDate,
    utc_hour: f64,
    event: SolarEvent,
) -> DateTime<Utc> {
    let offset = utc_offset_seconds(tz, date) as i64;
    let half_day = SECONDS_PER_DAY / 2;

    // Zone offset relative to local mean time, in (-12h, 12h]. Near the date
    // line the two can sit a whole day apart.
    let mean_time_shift = offset - (longitude / 15.0 * 3600.0).round() as i64;
    let mean_time_shift =
        half_day - (half_day - mean_time_shift).rem_euclid(SECONDS_PER_DAY);

    let mut local_seconds = (utc_hour * 3600.0).round() as i64 + offset;
    let anchor = (event.approx_hour() * 3600.0).round() as i64 + mean_time_shift;

    while local_seconds - anchor > half_day {
        local_seconds -= SECONDS_PER_DAY;
    }
    while anchor - local_seconds > half_day {
        local_seconds += SECONDS_PER_DAY;
    }

    let day_shift = local_seconds.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY) as u32;

    let local_date = date + chrono::Duration::days(day_shift);
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds_of_day, 0)
        .unwrap_or(NaiveTime::MIN);

    local_instant(tz, local_date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use chrono::{NaiveDate, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Minutes since local midnight of an instant in `tz`.
    fn local_minutes(instant: DateTime<Utc>, tz: Tz) -> i64 {
        let local = instant.with_timezone(&tz);
        (local.hour() * 60 + local.minute()) as i64
    }

    fn istanbul() -> GeoLocation {
        GeoLocation::new(
            "Istanbul",
            TEST_ISTANBUL_LATITUDE,
            TEST_ISTANBUL_LONGITUDE,
            Tz::Europe__Istanbul,
        )
        .unwrap()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_hours(-1.5), 22.5);
        assert_eq!(normalize_hours(24.0), 0.0);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(date(2024, 1, 1)), 1);
        assert_eq!(day_of_year(date(2024, 6, 21)), 173); // leap year
        assert_eq!(day_of_year(date(2023, 6, 21)), 172);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
    }

    #[test]
    fn test_istanbul_summer_solstice() {
        let events = calculate_solar_events(&istanbul(), date(2024, 6, 21)).unwrap();
        let tz = Tz::Europe__Istanbul;

        // Almanac values: sunrise 05:32, sunset 20:40 (UTC+3)
        assert!((local_minutes(events.sunrise, tz) - (5 * 60 + 32)).abs() <= 2);
        assert!((local_minutes(events.sunset, tz) - (20 * 60 + 40)).abs() <= 2);
        assert_eq!(events.sunrise.with_timezone(&tz).date_naive(), date(2024, 6, 21));
        assert_eq!(events.sunset.with_timezone(&tz).date_naive(), date(2024, 6, 21));
    }

    #[test]
    fn test_utc_hour_in_range() {
        for day in [1, 80, 173, 266, 355] {
            for event in [SolarEvent::Sunrise, SolarEvent::Sunset] {
                let hour = solar_event_utc_hour(TEST_ISTANBUL_LATITUDE, TEST_ISTANBUL_LONGITUDE, day, event)
                    .unwrap();
                assert!((0.0..24.0).contains(&hour), "hour {} out of range", hour);
            }
        }
    }

    #[test]
    fn test_polar_day_has_no_solution() {
        for latitude in [80.0, TEST_POLAR_LATITUDE] {
            let sunrise = solar_event_utc_hour(latitude, 0.0, 173, SolarEvent::Sunrise);
            let sunset = solar_event_utc_hour(latitude, 0.0, 173, SolarEvent::Sunset);
            assert!(sunrise.is_err());
            assert!(sunset.is_err());
        }

        let location = GeoLocation::new("North", TEST_POLAR_LATITUDE, 0.0, Tz::UTC).unwrap();
        let err = calculate_solar_events(&location, date(2024, 6, 21)).unwrap_err();
        assert_eq!(err.event, SolarEvent::Sunrise);
        assert_eq!(err.day_of_year, 173);
    }

    #[test]
    fn test_polar_night_has_no_solution() {
        let location = GeoLocation::new("South", -TEST_POLAR_LATITUDE, 0.0, Tz::UTC).unwrap();
        assert!(calculate_solar_events(&location, date(2024, 6, 21)).is_err());
    }

    #[test]
    fn test_exact_pole_has_no_solution() {
        assert!(solar_event_utc_hour(90.0, 0.0, 80, SolarEvent::Sunrise).is_err());
        assert!(solar_event_utc_hour(-90.0, 0.0, 80, SolarEvent::Sunset).is_err());
    }

    #[test]
    fn test_dst_transition_uses_offset_of_each_day() {
        let tz = Tz::America__New_York;
        let location =
            GeoLocation::new("New York", TEST_NEW_YORK_LATITUDE, TEST_NEW_YORK_LONGITUDE, tz).unwrap();

        // DST starts on 2024-03-10
        let before = calculate_solar_events(&location, date(2024, 3, 9)).unwrap();
        let after = calculate_solar_events(&location, date(2024, 3, 10)).unwrap();

        assert!((local_minutes(before.sunrise, tz) - (6 * 60 + 16)).abs() <= 2);
        assert!((local_minutes(after.sunrise, tz) - (7 * 60 + 14)).abs() <= 2);

        // In UTC the sun barely moves from one day to the next
        let drift = (after.sunrise - before.sunrise).num_minutes() - 24 * 60;
        assert!(drift.abs() <= 3, "unexpected UTC drift of {} minutes", drift);
    }

    #[test]
    fn test_far_east_zone_keeps_local_date() {
        // Sunrise in Sydney and Tokyo happens on the previous UTC day
        let sydney = GeoLocation::new("Sydney", -33.8688, 151.2093, Tz::Australia__Sydney).unwrap();
        let events = calculate_solar_events(&sydney, date(2024, 6, 21)).unwrap();
        let local_sunrise = events.sunrise.with_timezone(&Tz::Australia__Sydney);
        assert_eq!(local_sunrise.date_naive(), date(2024, 6, 21));
        assert!((local_minutes(events.sunrise, Tz::Australia__Sydney) - 7 * 60).abs() <= 2);
        assert!(events.sunrise < events.sunset);

        let tokyo = GeoLocation::new("Tokyo", 35.6762, 139.6503, Tz::Asia__Tokyo).unwrap();
        let events = calculate_solar_events(&tokyo, date(2024, 1, 1)).unwrap();
        assert_eq!(
            events.sunrise.with_timezone(&Tz::Asia__Tokyo).date_naive(),
            date(2024, 1, 1)
        );
        assert!((local_minutes(events.sunrise, Tz::Asia__Tokyo) - (6 * 60 + 51)).abs() <= 2);
    }

    #[test]
    fn test_zone_across_date_line_keeps_local_date() {
        // Lakeba sits west of 180° but keeps Fiji time (UTC+12)
        let tz = Tz::Pacific__Fiji;
        let lakeba = GeoLocation::new("Lakeba", -18.2, -178.8, tz).unwrap();
        let events = calculate_solar_events(&lakeba, date(2024, 6, 21)).unwrap();

        assert_eq!(events.sunrise.with_timezone(&tz).date_naive(), date(2024, 6, 21));
        assert_eq!(events.sunset.with_timezone(&tz).date_naive(), date(2024, 6, 21));
        assert!(events.sunrise < events.sunset);
        assert!((5 * 60..8 * 60).contains(&local_minutes(events.sunrise, tz)));

        // Chukotka east of 180° on Anadyr time (UTC+12)
        let tz = Tz::Asia__Anadyr;
        let uelen = GeoLocation::new("Uelen", 66.16, -169.81, tz).unwrap();
        let events = calculate_solar_events(&uelen, date(2024, 3, 20)).unwrap();
        assert_eq!(events.sunrise.with_timezone(&tz).date_naive(), date(2024, 3, 20));
        assert_eq!(events.sunset.with_timezone(&tz).date_naive(), date(2024, 3, 20));
    }

    #[test]
    fn test_sunset_after_local_midnight_rolls_to_next_day() {
        let tz = Tz::Atlantic__Reykjavik;
        let reykjavik = GeoLocation::new("Reykjavik", 64.1466, -21.9426, tz).unwrap();
        let events = calculate_solar_events(&reykjavik, date(2024, 6, 21)).unwrap();

        let sunset = events.sunset.with_timezone(&tz);
        assert_eq!(sunset.date_naive(), date(2024, 6, 22));
        assert!(local_minutes(events.sunset, tz) <= 10);
        assert!(events.sunrise < events.sunset);
    }
}
