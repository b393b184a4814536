//! # vakit
//!
//! Daily prayer times from the position of the sun.
//!
//! vakit converts a geographic coordinate and a calendar day into the six
//! daily prayer instants, and keeps a previous/next timeline as time moves
//! on. It is the computational core behind countdowns, notifications and
//! widgets; the caller supplies the current time, so every result is a pure
//! function of its inputs.
//!
//! ## Architecture
//!
//! - **geo**: locations, the sunrise equation, timezones and the location catalog
//! - **prayer**: prayer kinds, instants, daily schedules and timelines
//! - **schedule**: daily schedule derivation and the rolling timeline
//! - **snapshot**: formatted view for display consumers
//! - **config**: configuration loading and validation
//! - **args**: command-line parsing
//! - **constants**: empirical constants and defaults
//! - **logger**: structured console logging
//! - **utils**: formatting helpers

pub mod args;
pub mod config;
pub mod constants;
pub mod geo;
pub mod logger;
pub mod prayer;
pub mod schedule;
pub mod snapshot;
pub mod utils;

// Re-export important types for easier access
pub use config::{Config, validate_config};
pub use geo::{GeoLocation, LocationCatalog, NoSolution, SolarEvents, calculate_solar_events};
pub use logger::{Log, LogLevel};
pub use prayer::{DailySchedule, Language, PrayerInstant, PrayerKind, Timeline};
pub use schedule::{PrayerScheduleEngine, ScheduleParams};
pub use snapshot::{DisplayOptions, PrayerSnapshot};
