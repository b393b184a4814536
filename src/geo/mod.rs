//! Geographic locations and the solar calculations performed for them.
//!
//! This module provides:
//! - The [`GeoLocation`] value type (coordinates + timezone)
//! - Solar event calculations for sunrise/sunset instants
//! - Timezone detection and per-day offset handling
//! - A name-based location catalog

pub mod catalog;
pub mod solar;
pub mod timezone;

pub use catalog::LocationCatalog;
pub use solar::{NoSolution, SolarEvents, calculate_solar_events};

use anyhow::Result;
use chrono_tz::Tz;

/// A place on Earth for which prayer times are computed.
///
/// Immutable once built; construct it through [`GeoLocation::new`] so the
/// coordinates are known to be in range.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    name: String,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

impl GeoLocation {
    /// Create a validated location.
    ///
    /// # Errors
    /// Latitude outside -90..=90 or longitude outside -180..=180.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, timezone: Tz) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
            timezone,
        })
    }

    /// Create a location whose timezone is looked up from its coordinates.
    pub fn with_detected_timezone(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        let timezone = timezone::determine_timezone_from_coordinates(latitude, longitude);
        Self::new(name, latitude, longitude, timezone)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Coordinates formatted as `41.0082°N, 28.9784°E`.
    pub fn coordinates_for_display(&self) -> String {
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            if self.latitude >= 0.0 { "N" } else { "S" },
            self.longitude.abs(),
            if self.longitude >= 0.0 { "E" } else { "W" }
        )
    }
}

/// Validate a latitude/longitude pair.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        anyhow::bail!(
            "Invalid latitude: {}. Must be between -90 and 90 degrees",
            latitude
        );
    }
    if !(-180.0..=180.0).contains(&longitude) {
        anyhow::bail!(
            "Invalid longitude: {}. Must be between -180 and 180 degrees",
            longitude
        );
    }
    Ok(())
}
