//! Command-line interface for the refuelling planner.
//!
//! Three subcommands share one configuration model:
//!
//! - `import-stations` loads an OPIS-style CSV price list into the SQLite
//!   station store.
//! - `plan` resolves a JSON request's start and end, fetches the route,
//!   and prints the cheapest refuelling plan the chosen algorithm finds.
//! - `nearby` does the same lookup but only lists the stations within the
//!   corridor.
//!
//! Options come from flags, `REFUEL_`-prefixed environment variables and
//! configuration files, merged by `ortho_config`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use std::io::Write;

mod error;
mod import;
mod plan;
mod request;

pub use error::CliError;

use import::{ImportStationsArgs, run_import_stations};
use plan::{NearbyArgs, PlanArgs, run_nearby, run_plan};

const ARG_CSV: &str = "csv";
const ARG_DATABASE: &str = "database";
const ARG_REQUEST: &str = "request";
const ARG_STATIONS_DB: &str = "stations-db";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_NOMINATIM_BASE_URL: &str = "nominatim-base-url";
const ARG_TANK_GALLONS: &str = "tank-gallons";
const ARG_MPG: &str = "mpg";
const ARG_INTERVAL_MILES: &str = "interval-miles";
const ARG_OUTPUT: &str = "output";
const ARG_OFFLINE: &str = "offline";
const ENV_IMPORT_CSV: &str = "REFUEL_CMDS_IMPORT_STATIONS_CSV";
const ENV_IMPORT_DATABASE: &str = "REFUEL_CMDS_IMPORT_STATIONS_DATABASE";
const ENV_PLAN_REQUEST: &str = "REFUEL_CMDS_PLAN_REQUEST_PATH";
const ENV_PLAN_STATIONS_DB: &str = "REFUEL_CMDS_PLAN_STATIONS_DB";
const ENV_NEARBY_REQUEST: &str = "REFUEL_CMDS_NEARBY_REQUEST_PATH";
const ENV_NEARBY_STATIONS_DB: &str = "REFUEL_CMDS_NEARBY_STATIONS_DB";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError::ArgumentParsing`] for usage errors (including
/// `--help`), and the failure of the selected subcommand otherwise.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::ImportStations(args) => run_import_stations(args, &mut stdout),
        Command::Plan(args) => run_plan(args, &mut stdout),
        Command::Nearby(args) => run_nearby(args, &mut stdout),
    }
}

/// Fail unless `path` names an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match refuel_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: serde::Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "refuel",
    about = "Plan the cheapest fuel stops along a driving route",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a station price list into the SQLite station store.
    ImportStations(ImportStationsArgs),
    /// Compute a refuelling plan for a JSON request.
    Plan(PlanArgs),
    /// List stations near the route of a JSON request.
    Nearby(NearbyArgs),
}

#[cfg(test)]
mod tests;
