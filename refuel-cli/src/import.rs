//! `import-stations` subcommand.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use refuel_data::stations::import_stations_csv;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CSV, ARG_DATABASE, CliError, ENV_IMPORT_CSV, ENV_IMPORT_DATABASE, require_existing,
    write_json,
};

/// CLI arguments for the `import-stations` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read an OPIS-style truck stop price list and replace the \
                 station table of the SQLite store used by `plan` and \
                 `nearby`. Rows without coordinates or with non-positive \
                 prices are skipped; duplicate station ids keep the lowest \
                 price.",
    about = "Import a station price list"
)]
#[ortho_config(prefix = "REFUEL")]
pub(crate) struct ImportStationsArgs {
    /// Path to the CSV price list.
    #[arg(long = ARG_CSV, value_name = "path")]
    #[serde(default)]
    pub(crate) csv: Option<Utf8PathBuf>,
    /// Path of the SQLite database to write.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportStationsArgs {
    fn into_config(self) -> Result<ImportStationsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportStationsConfig::try_from(merged)
    }
}

/// Resolved `import-stations` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportStationsConfig {
    pub(crate) csv: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ImportStationsArgs> for ImportStationsConfig {
    type Error = CliError;

    fn try_from(args: ImportStationsArgs) -> Result<Self, Self::Error> {
        let csv = args.csv.ok_or(CliError::MissingArgument {
            field: ARG_CSV,
            env: ENV_IMPORT_CSV,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_IMPORT_DATABASE,
        })?;
        Ok(Self { csv, database })
    }
}

pub(crate) fn run_import_stations(
    args: ImportStationsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_import(&config, writer)
}

pub(crate) fn execute_import(
    config: &ImportStationsConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    require_existing(&config.csv, ARG_CSV)?;
    let summary = import_stations_csv(&config.csv, &config.database)?;
    write_json(writer, &summary)
}
