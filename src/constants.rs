//! Application constants and default values for vakit.
//!
//! This module contains the empirical constants of the sunrise equation, the
//! prayer offsets applied on top of sunrise/sunset, the fixed fallback schedule
//! used when the equation has no solution, and the validation limits for
//! configuration overrides.

// ═══ Sunrise Equation Constants ═══
// Empirical almanac approximation; values must be preserved exactly

pub const SUN_ZENITH_DEGREES: f64 = 90.833; // Refraction + solar disk radius
pub const MEAN_ANOMALY_RATE: f64 = 0.9856; // Degrees per day
pub const MEAN_ANOMALY_OFFSET: f64 = 3.289;
pub const EQUATION_OF_CENTER_1: f64 = 1.916;
pub const EQUATION_OF_CENTER_2: f64 = 0.020;
pub const PERIHELION_LONGITUDE: f64 = 282.634;
pub const OBLIQUITY_TAN_FACTOR: f64 = 0.91764;
pub const OBLIQUITY_SIN_FACTOR: f64 = 0.39782;
pub const SIDEREAL_DRIFT: f64 = 0.06571;
pub const LOCAL_MEAN_TIME_OFFSET: f64 = 6.622;
pub const APPROX_SUNRISE_HOUR: f64 = 6.0;
pub const APPROX_SUNSET_HOUR: f64 = 18.0;

pub const SECONDS_PER_DAY: i64 = 86_400;

// ═══ Prayer Offsets ═══
// Heuristics applied to the solar events, not derivable from first principles

pub const DEFAULT_FAJR_OFFSET_MINUTES: i64 = 90; // Before sunrise
pub const DEFAULT_ISHA_OFFSET_MINUTES: i64 = 90; // After sunset
pub const DEFAULT_ASR_MIN_GAP_MINUTES: i64 = 150; // 2.5 hours after midday at least
pub const DEFAULT_ASR_RATIO: f64 = 0.55; // Share of the midday-to-sunset span
pub const DEFAULT_ASR_SUNSET_MARGIN_MINUTES: i64 = 75; // Asr never later than sunset - 75min

// ═══ Fallback Schedule ═══
// Local wall-clock times used when the sun never rises or never sets

pub const FALLBACK_FAJR: (u32, u32) = (5, 30);
pub const FALLBACK_SUNRISE: (u32, u32) = (7, 0);
pub const FALLBACK_DHUHR: (u32, u32) = (12, 55);
pub const FALLBACK_ASR: (u32, u32) = (16, 20);
pub const FALLBACK_MAGHRIB: (u32, u32) = (19, 5);
pub const FALLBACK_ISHA: (u32, u32) = (20, 30);

// ═══ Validation Limits ═══
// Bounds for schedule overrides coming from the configuration file

pub const MINIMUM_PRAYER_OFFSET_MINUTES: i64 = 1; // zero would merge two prayers
pub const MAXIMUM_PRAYER_OFFSET_MINUTES: i64 = 180; // 3 hours
pub const MINIMUM_ASR_GAP_MINUTES: i64 = 30;
pub const MAXIMUM_ASR_GAP_MINUTES: i64 = 360;
pub const MINIMUM_ASR_RATIO: f64 = 0.1;
pub const MAXIMUM_ASR_RATIO: f64 = 0.9;

// ═══ Display Defaults ═══

pub const DEFAULT_LANGUAGE: &str = "turkish";
pub const DEFAULT_TIME_FORMAT: &str = "24h";
pub const DEFAULT_LOCATION: &str = "Istanbul";
pub const CLOCK_FORMAT_24H: &str = "%H:%M";
pub const CLOCK_FORMAT_12H: &str = "%I:%M %p";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
