use anyhow::Result;
use chrono::{NaiveDate, Utc};

use vakit::args::{CliAction, ParsedArgs, RunOptions, display_help, display_version_info};
use vakit::constants::EXIT_FAILURE;
use vakit::geo::solar::{SolarEvent, day_of_year, solar_event_utc_hour};
use vakit::geo::timezone::timezone_label;
use vakit::utils::{format_clock, format_duration_short};
use vakit::{
    Config, DisplayOptions, GeoLocation, LocationCatalog, Log, PrayerScheduleEngine,
    PrayerSnapshot, validate_config,
};

fn main() {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelp => display_help(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run(options) => {
            if let Err(e) = run(options) {
                Log::log_pipe();
                Log::log_critical(&format!("{:#}", e));
                Log::log_end();
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
}

fn run(options: RunOptions) -> Result<()> {
    Log::log_version();

    let mut config = Config::load()?;
    config.apply_cli_overrides(&options);
    validate_config(&config)?;

    let catalog = LocationCatalog::builtin();
    let location = config.resolve_location(&catalog)?;
    let engine = PrayerScheduleEngine::new(config.schedule_params());
    let display = config.display_options();

    // The only clock read; everything below works from this instant
    let now = Utc::now();

    Log::log_block_start(&format!("Location: {}", location.name()));
    Log::log_indented(&format!("Coordinates: {}", location.coordinates_for_display()));
    Log::log_indented(&format!(
        "Timezone: {}",
        timezone_label(&location.timezone(), now)
    ));

    let date = options
        .date
        .unwrap_or_else(|| now.with_timezone(&location.timezone()).date_naive());

    if options.debug_enabled {
        log_solar_debug_info(&location, date);
    }

    match options.date {
        Some(date) => print_schedule(&engine, &location, date, &display),
        None => print_snapshot(&engine, &location, now, &display),
    }

    Log::log_end();
    Ok(())
}

fn print_schedule(
    engine: &PrayerScheduleEngine,
    location: &GeoLocation,
    date: NaiveDate,
    display: &DisplayOptions,
) {
    let schedule = engine.entries_for_day(location, date);
    let tz = location.timezone();

    Log::log_block_start(&format!("Prayer times for {}", date.format("%Y-%m-%d")));
    if schedule.used_fallback {
        warn_fallback();
    }
    for entry in schedule.iter() {
        Log::log_indented(&format!(
            "{:<8} {}",
            entry.kind.label(display.language),
            format_clock(entry.timestamp, tz, display.time_format)
        ));
    }
}

fn print_snapshot(
    engine: &PrayerScheduleEngine,
    location: &GeoLocation,
    now: chrono::DateTime<Utc>,
    display: &DisplayOptions,
) {
    let snapshot = PrayerSnapshot::capture(engine, location, now, display);

    Log::log_block_start(&format!("Prayer times for today ({})", snapshot.local_time));
    if snapshot.used_fallback {
        warn_fallback();
    }
    for row in &snapshot.rows {
        let marker = if row.instant == snapshot.timeline.next {
            "→"
        } else {
            " "
        };
        Log::log_indented(&format!("{} {:<8} {}", marker, row.label, row.time));
    }

    Log::log_block_start(&format!(
        "Next: {} at {} (in {})",
        snapshot.next_label, snapshot.next_time, snapshot.remaining
    ));
    Log::log_indented(&format!(
        "Since {}: {}",
        snapshot.previous_label,
        format_duration_short(now - snapshot.timeline.previous.timestamp)
    ));
}

fn warn_fallback() {
    Log::log_warning("The sun does not rise or set here today");
    Log::log_indented("Showing the fixed fallback schedule");
}

/// Log the raw equation results for a location and day.
fn log_solar_debug_info(location: &GeoLocation, date: NaiveDate) {
    let day = day_of_year(date);

    Log::log_pipe();
    Log::log_debug("Solar calculation details:");
    Log::log_indented(&format!("Day of year: {}", day));

    for event in [SolarEvent::Sunrise, SolarEvent::Sunset] {
        let label = match event {
            SolarEvent::Sunrise => "Sunrise UTC",
            SolarEvent::Sunset => "Sunset UTC",
        };
        match solar_event_utc_hour(location.latitude(), location.longitude(), day, event) {
            Ok(hour) => {
                let seconds = (hour * 3600.0).round() as i64;
                Log::log_indented(&format!(
                    "{}: {:02}:{:02}:{:02}",
                    label,
                    seconds / 3600,
                    (seconds % 3600) / 60,
                    seconds % 60
                ));
            }
            Err(e) => Log::log_indented(&format!("{}: {}", label, e)),
        }
    }
}
