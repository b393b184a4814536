//! Command-line argument parsing and processing.
//!
//! Arguments are parsed with clap and reduced to a [`CliAction`] so that the
//! binary only has to match on what to do. Help and version requests, as well
//! as malformed input, become actions of their own instead of exiting inside
//! the parser.

use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

use crate::logger::Log;

#[derive(Parser, Debug)]
#[command(
    name = "vakit",
    version,
    about = "Prayer times and the next-prayer countdown for any location"
)]
struct Cli {
    /// Location name from the catalog, e.g. "Istanbul" or "Paris, France"
    #[arg(short, long)]
    location: Option<String>,

    /// Latitude in degrees (requires --lon)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in degrees (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// IANA timezone identifier, e.g. "Europe/Istanbul"
    #[arg(long)]
    tz: Option<String>,

    /// Show the schedule of this date (YYYY-MM-DD) instead of today's timeline
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print solar calculation details
    #[arg(short, long)]
    debug: bool,
}

/// Settings for a normal run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub location: Option<String>,
    pub coordinates: Option<(f64, f64)>,
    pub timezone: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute and print prayer times with these settings
    Run(RunOptions),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments, program name first
    pub fn parse<I, T>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let action = match Cli::try_parse_from(args) {
            Ok(cli) => CliAction::Run(RunOptions {
                debug_enabled: cli.debug,
                location: cli.location,
                coordinates: cli.lat.zip(cli.lon),
                timezone: cli.tz,
                date: cli.date,
            }),
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    CliAction::ShowHelp
                }
                ErrorKind::DisplayVersion => CliAction::ShowVersion,
                _ => {
                    let message = e.to_string();
                    let first_line = message.lines().next().unwrap_or("Invalid arguments");
                    Log::log_warning(first_line.trim_start_matches("error: "));
                    CliAction::ShowHelpDueToError
                }
            },
        };

        ParsedArgs { action }
    }

    /// Parse arguments from the process environment.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args_os())
    }
}

/// Display version information.
pub fn display_version_info() {
    Log::log_version();
    Log::log_decorated(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_end();
}

/// Display help information.
pub fn display_help() {
    let help = Cli::command().render_help();
    println!("{}", help);
}
