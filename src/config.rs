//! Configuration system for vakit with validation.
//!
//! The configuration lives in `vakit.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/vakit/vakit.toml` on Linux). A default file is written
//! on first run.
//!
//! ## Configuration Structure
//!
//! ```toml
//! # Location selection (catalog name, or explicit coordinates)
//! location = "Istanbul"
//! # latitude = 41.0082
//! # longitude = 28.9784
//! # timezone = "Europe/Istanbul"       # looked up from coordinates if omitted
//!
//! # Display
//! language = "turkish"                  # "turkish" or "english"
//! time_format = "24h"                   # "24h" or "12h"
//!
//! # Prayer offsets (minutes unless noted)
//! [schedule]
//! fajr_offset = 90                      # before sunrise
//! isha_offset = 90                      # after sunset
//! asr_min_gap = 150                     # minimum time after midday
//! asr_ratio = 0.55                      # share of midday-to-sunset span
//! asr_sunset_margin = 75                # asr never later than sunset minus this
//!
//! # Extra catalog entries, looked up before the built-in city database
//! [[locations]]
//! name = "Home"
//! latitude = 40.1885
//! longitude = 29.0610
//! timezone = "Europe/Istanbul"
//! ```
//!
//! ## Validation
//!
//! Coordinates must be in range and come as a pair, timezone names must be
//! valid IANA identifiers, and schedule offsets are bounded so the derived
//! schedule stays in daily order.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::args::RunOptions;
use crate::constants::*;
use crate::geo::catalog::{CatalogEntry, LocationCatalog};
use crate::geo::timezone::{determine_timezone_from_coordinates, parse_timezone};
use crate::geo::{GeoLocation, validate_coordinates};
use crate::logger::Log;
use crate::prayer::Language;
use crate::schedule::ScheduleParams;
use crate::snapshot::DisplayOptions;
use crate::utils::TimeFormat;

/// Overrides for the empirical prayer offsets.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    pub fajr_offset: Option<i64>,       // minutes before sunrise
    pub isha_offset: Option<i64>,       // minutes after sunset
    pub asr_min_gap: Option<i64>,       // minutes after midday
    pub asr_ratio: Option<f64>,         // share of midday-to-sunset span
    pub asr_sunset_margin: Option<i64>, // minutes before sunset
}

/// A user-defined catalog entry.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
}

/// Configuration structure for vakit settings.
///
/// Every field is optional; missing values fall back to the defaults in
/// [`crate::constants`].
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog name of the location, e.g. `"Istanbul"` or `"Paris, France"`.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub language: Option<Language>,
    pub time_format: Option<TimeFormat>,
    pub schedule: Option<ScheduleConfig>,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("vakit").join("vakit.toml"))
    }

    /// Load the configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Load and validate a configuration file at a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Write the default configuration file.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = format!(
            "#[Location]\n\
             location = \"{}\"            # Catalog name, or set latitude/longitude below\n\
             # latitude = 41.0082\n\
             # longitude = 28.9784\n\
             # timezone = \"Europe/Istanbul\"\n\
             \n\
             #[Display]\n\
             language = \"{}\"             # \"turkish\" or \"english\"\n\
             time_format = \"{}\"               # \"24h\" or \"12h\"\n\
             \n\
             #[Prayer offsets]\n\
             [schedule]\n\
             fajr_offset = {}                  # Minutes before sunrise\n\
             isha_offset = {}                  # Minutes after sunset\n\
             asr_min_gap = {}                 # Minimum minutes after midday\n\
             asr_ratio = {}                  # Share of the midday-to-sunset span\n\
             asr_sunset_margin = {}            # Asr is never later than sunset minus this\n",
            DEFAULT_LOCATION,
            DEFAULT_LANGUAGE,
            DEFAULT_TIME_FORMAT,
            DEFAULT_FAJR_OFFSET_MINUTES,
            DEFAULT_ISHA_OFFSET_MINUTES,
            DEFAULT_ASR_MIN_GAP_MINUTES,
            DEFAULT_ASR_RATIO,
            DEFAULT_ASR_SUNSET_MARGIN_MINUTES,
        );

        fs::write(path, content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_block_start(&format!(
            "Created new config file: {}",
            crate::utils::path_for_display(path)
        ));

        Ok(())
    }

    /// Apply command-line options, which take precedence over the file.
    ///
    /// A location given on the command line replaces the configured one
    /// entirely, so a configured timezone only survives alongside the
    /// location it was written for. `--tz` is applied last.
    pub fn apply_cli_overrides(&mut self, options: &RunOptions) {
        if let Some(location) = &options.location {
            self.location = Some(location.clone());
            self.latitude = None;
            self.longitude = None;
            self.timezone = None;
        }
        if let Some((latitude, longitude)) = options.coordinates {
            self.latitude = Some(latitude);
            self.longitude = Some(longitude);
            self.timezone = None;
        }
        if let Some(timezone) = &options.timezone {
            self.timezone = Some(timezone.clone());
        }
    }

    /// Schedule parameters with overrides applied.
    pub fn schedule_params(&self) -> ScheduleParams {
        let defaults = ScheduleParams::default();
        let Some(schedule) = &self.schedule else {
            return defaults;
        };

        let minutes = |value: Option<i64>, default: chrono::Duration| {
            value.map(chrono::Duration::minutes).unwrap_or(default)
        };

        ScheduleParams {
            fajr_offset: minutes(schedule.fajr_offset, defaults.fajr_offset),
            isha_offset: minutes(schedule.isha_offset, defaults.isha_offset),
            asr_min_gap: minutes(schedule.asr_min_gap, defaults.asr_min_gap),
            asr_ratio: schedule.asr_ratio.unwrap_or(defaults.asr_ratio),
            asr_sunset_margin: minutes(schedule.asr_sunset_margin, defaults.asr_sunset_margin),
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            language: self.language.unwrap_or_default(),
            time_format: self.time_format.unwrap_or_default(),
        }
    }

    /// User-defined catalog entries.
    pub fn catalog_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.locations
            .iter()
            .map(|location| -> Result<CatalogEntry> {
                let timezone = location
                    .timezone
                    .as_deref()
                    .map(parse_timezone)
                    .transpose()
                    .with_context(|| format!("Invalid timezone for location {}", location.name))?;
                Ok(CatalogEntry {
                    name: location.name.clone(),
                    country: location.country.clone(),
                    latitude: location.latitude,
                    longitude: location.longitude,
                    timezone,
                })
            })
            .collect()
    }

    /// Resolve the configured location.
    ///
    /// # Priority Order
    /// 1. Explicit `latitude`/`longitude` (with optional `timezone`)
    /// 2. `location` looked up in the catalog (custom entries first)
    /// 3. The default location
    pub fn resolve_location(&self, catalog: &LocationCatalog) -> Result<GeoLocation> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            let timezone = match self.timezone.as_deref() {
                Some(name) => parse_timezone(name)?,
                None => determine_timezone_from_coordinates(latitude, longitude),
            };
            let name = self
                .location
                .clone()
                .unwrap_or_else(|| format!("{:.4}, {:.4}", latitude, longitude));
            return GeoLocation::new(name, latitude, longitude, timezone);
        }

        let catalog = catalog.clone().with_custom(self.catalog_entries()?);
        let query = self.location.as_deref().unwrap_or(DEFAULT_LOCATION);
        let mut location = catalog.resolve(query)?;

        if let Some(name) = self.timezone.as_deref() {
            let timezone = parse_timezone(name)?;
            location = GeoLocation::new(
                location.name(),
                location.latitude(),
                location.longitude(),
                timezone,
            )?;
        }

        Ok(location)
    }
}

/// Validate every field of a configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(latitude), Some(longitude)) => validate_coordinates(latitude, longitude)?,
        (None, None) => {}
        _ => anyhow::bail!("latitude and longitude must be set together"),
    }

    if let Some(name) = config.timezone.as_deref() {
        parse_timezone(name)?;
    }

    if let Some(location) = config.location.as_deref() {
        if location.trim().is_empty() {
            anyhow::bail!("location must not be empty");
        }
    }

    for location in &config.locations {
        if location.name.trim().is_empty() {
            anyhow::bail!("Custom location names must not be empty");
        }
        validate_coordinates(location.latitude, location.longitude)
            .with_context(|| format!("Invalid coordinates for location {}", location.name))?;
        if let Some(name) = location.timezone.as_deref() {
            parse_timezone(name)
                .with_context(|| format!("Invalid timezone for location {}", location.name))?;
        }
    }

    if let Some(schedule) = &config.schedule {
        validate_schedule(schedule)?;
    }

    Ok(())
}

fn validate_schedule(schedule: &ScheduleConfig) -> Result<()> {
    let offsets = [
        ("fajr_offset", schedule.fajr_offset),
        ("isha_offset", schedule.isha_offset),
        ("asr_sunset_margin", schedule.asr_sunset_margin),
    ];
    for (name, value) in offsets {
        if let Some(minutes) = value {
            if !(MINIMUM_PRAYER_OFFSET_MINUTES..=MAXIMUM_PRAYER_OFFSET_MINUTES).contains(&minutes) {
                anyhow::bail!(
                    "{} ({} minutes) must be between {} and {} minutes",
                    name,
                    minutes,
                    MINIMUM_PRAYER_OFFSET_MINUTES,
                    MAXIMUM_PRAYER_OFFSET_MINUTES
                );
            }
        }
    }

    if let Some(gap) = schedule.asr_min_gap {
        if !(MINIMUM_ASR_GAP_MINUTES..=MAXIMUM_ASR_GAP_MINUTES).contains(&gap) {
            anyhow::bail!(
                "asr_min_gap ({} minutes) must be between {} and {} minutes",
                gap,
                MINIMUM_ASR_GAP_MINUTES,
                MAXIMUM_ASR_GAP_MINUTES
            );
        }
    }

    if let Some(ratio) = schedule.asr_ratio {
        if !(MINIMUM_ASR_RATIO..=MAXIMUM_ASR_RATIO).contains(&ratio) {
            anyhow::bail!(
                "asr_ratio ({}) must be between {} and {}",
                ratio,
                MINIMUM_ASR_RATIO,
                MAXIMUM_ASR_RATIO
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use serial_test::serial;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        validate_config(&config)?;
        Ok(config)
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.schedule_params(), ScheduleParams::default());
        assert_eq!(config.display_options(), DisplayOptions::default());
        assert!(config.locations.is_empty());
    }

    #[test]
    fn test_schedule_overrides() {
        let config = parse(
            r#"
[schedule]
fajr_offset = 80
asr_ratio = 0.5
"#,
        )
        .unwrap();
        let params = config.schedule_params();
        assert_eq!(params.fajr_offset, chrono::Duration::minutes(80));
        assert_eq!(params.isha_offset, chrono::Duration::minutes(90));
        assert_eq!(params.asr_ratio, 0.5);
    }

    #[test]
    fn test_display_options_parse() {
        let config = parse("language = \"english\"\ntime_format = \"12h\"\n").unwrap();
        let options = config.display_options();
        assert_eq!(options.language, Language::English);
        assert_eq!(options.time_format, TimeFormat::TwelveHour);

        assert!(parse("time_format = \"13h\"").is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(parse("latitude = 95.0\nlongitude = 10.0").is_err());
        assert!(parse("latitude = 41.0").is_err());
        assert!(parse("timezone = \"Nowhere/Special\"").is_err());
        assert!(parse("location = \"  \"").is_err());
        assert!(parse("[schedule]\nfajr_offset = 500").is_err());
        assert!(parse("[schedule]\nasr_min_gap = 5").is_err());
        assert!(parse("[schedule]\nasr_ratio = 1.5").is_err());
        assert!(parse("[schedule]\nisha_offset = 0").is_err());
        assert!(parse("[schedule]\nfajr_offset = 0").is_err());
        assert!(parse("[schedule]\nasr_sunset_margin = 0\nasr_ratio = 0.9").is_err());
        assert!(parse("unknown_key = 1").is_err());
        assert!(
            parse("[[locations]]\nname = \"x\"\nlatitude = 0.0\nlongitude = 200.0").is_err()
        );
    }

    #[test]
    fn test_smallest_offsets_keep_prayers_apart() {
        use crate::prayer::PrayerKind;
        use crate::schedule::PrayerScheduleEngine;

        let config = parse(
            r#"
latitude = 41.0082
longitude = 28.9784
timezone = "Europe/Istanbul"

[schedule]
fajr_offset = 1
isha_offset = 1
asr_sunset_margin = 1
asr_ratio = 0.9
"#,
        )
        .unwrap();
        let location = config.resolve_location(&LocationCatalog::empty()).unwrap();
        let engine = PrayerScheduleEngine::new(config.schedule_params());
        let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();

        let schedule = engine.entries_for_day(&location, date);
        let kinds: Vec<PrayerKind> = schedule.iter().map(|entry| entry.kind).collect();
        assert_eq!(kinds, PrayerKind::ALL.to_vec());
        for pair in schedule.entries.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }

        // One second past maghrib the old next becomes the new previous
        let maghrib = schedule.get(PrayerKind::Maghrib).unwrap();
        let before = engine.timeline(&location, maghrib.timestamp - chrono::Duration::seconds(1));
        assert_eq!(before.next, maghrib);
        let after = engine.timeline(&location, maghrib.timestamp + chrono::Duration::seconds(1));
        assert_eq!(after.previous, maghrib);
        assert_eq!(after.next.kind, PrayerKind::Isha);
    }

    #[test]
    fn test_resolve_explicit_coordinates() {
        let config = parse(
            "latitude = 41.0082\nlongitude = 28.9784\ntimezone = \"Europe/Istanbul\"\n",
        )
        .unwrap();
        let location = config.resolve_location(&LocationCatalog::empty()).unwrap();
        assert_eq!(location.timezone(), Tz::Europe__Istanbul);
        assert_eq!(location.name(), "41.0082, 28.9784");
    }

    #[test]
    fn test_resolve_custom_location() {
        let config = parse(
            r#"
location = "home"

[[locations]]
name = "Home"
latitude = 40.1885
longitude = 29.0610
timezone = "Europe/Istanbul"
"#,
        )
        .unwrap();
        let location = config.resolve_location(&LocationCatalog::empty()).unwrap();
        assert_eq!(location.name(), "Home");
        assert_eq!(location.latitude(), 40.1885);
    }

    #[test]
    fn test_cli_location_drops_configured_timezone() {
        let mut config = parse(
            r#"
location = "Home"
timezone = "Europe/Istanbul"

[[locations]]
name = "Home"
latitude = 41.0082
longitude = 28.9784

[[locations]]
name = "Tokyo"
latitude = 35.6762
longitude = 139.6503
timezone = "Asia/Tokyo"
"#,
        )
        .unwrap();

        let options = RunOptions {
            location: Some("Tokyo".to_string()),
            ..RunOptions::default()
        };
        config.apply_cli_overrides(&options);
        assert_eq!(config.timezone, None);

        let location = config.resolve_location(&LocationCatalog::empty()).unwrap();
        assert_eq!(location.name(), "Tokyo");
        assert_eq!(location.timezone(), Tz::Asia__Tokyo);
    }

    #[test]
    fn test_cli_coordinates_with_timezone() {
        let mut config = parse("timezone = \"Europe/Istanbul\"").unwrap();
        let options = RunOptions {
            coordinates: Some((35.6762, 139.6503)),
            timezone: Some("Asia/Tokyo".to_string()),
            ..RunOptions::default()
        };
        config.apply_cli_overrides(&options);

        assert_eq!(config.latitude, Some(35.6762));
        assert_eq!(config.timezone.as_deref(), Some("Asia/Tokyo"));
        let location = config.resolve_location(&LocationCatalog::empty()).unwrap();
        assert_eq!(location.timezone(), Tz::Asia__Tokyo);
    }

    #[test]
    fn test_resolve_unknown_location_fails() {
        let config = parse("location = \"Atlantis\"").unwrap();
        assert!(config.resolve_location(&LocationCatalog::empty()).is_err());
    }

    #[test]
    #[serial]
    fn test_default_config_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("vakit").join("vakit.toml");

        crate::logger::Log::set_enabled(false);
        Config::create_default_config(&path).unwrap();
        crate::logger::Log::set_enabled(true);

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.location.as_deref(), Some(DEFAULT_LOCATION));
        assert_eq!(config.schedule_params(), ScheduleParams::default());
        assert_eq!(config.display_options(), DisplayOptions::default());
    }

    #[test]
    fn test_load_missing_path_fails() {
        let temp_dir = tempdir().unwrap();
        assert!(Config::load_from_path(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    #[serial]
    fn test_config_load_default_creation() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("vakit").join("vakit.toml");

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        crate::logger::Log::set_enabled(false);
        let result = Config::load();
        crate::logger::Log::set_enabled(true);

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert!(result.is_ok());
        assert!(config_path.exists());
    }
}
