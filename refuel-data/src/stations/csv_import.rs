//! CSV decoding and validation.

use std::collections::BTreeMap;
use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, Trim};
use geo::Coord;
use refuel_core::FuelStation;
use refuel_core::store::{SqliteStationStoreError, write_stations_database};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Distinct stations written.
    pub imported: usize,
    /// Rows rejected for missing or invalid data.
    pub skipped: usize,
    /// Rows folded into an earlier row with the same station id.
    pub duplicates: usize,
}

/// Errors that abort an import.
///
/// Bad rows never abort; they are logged and counted in
/// [`ImportSummary::skipped`].
#[derive(Debug, Error)]
pub enum StationImportError {
    /// The CSV file could not be opened.
    #[error("failed to open station CSV at {path}")]
    OpenCsv {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The CSV stream could not be read or lacks a header row.
    #[error("failed to read station CSV")]
    Csv(#[from] csv::Error),
    /// The target database directory could not be prepared.
    #[error("failed to prepare database directory for {path}")]
    PrepareDatabase {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Writing the station table failed.
    #[error("failed to write station database")]
    Database(#[from] SqliteStationStoreError),
}

#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "OPIS Truckstop ID")]
    id: u64,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Retail Price", deserialize_with = "csv::invalid_option")]
    price: Option<f64>,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

impl StationRow {
    fn display_address(&self) -> String {
        [&self.address, &self.city, &self.state]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn into_station(self) -> Result<FuelStation, String> {
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            return Err("missing coordinates".to_owned());
        };
        let Some(price) = self.price else {
            return Err("missing retail price".to_owned());
        };
        let address = self.display_address();
        FuelStation::new(self.id, self.name, address, Coord { x: lon, y: lat }, price)
            .map_err(|err| err.to_string())
    }
}

/// Decode stations from CSV.
///
/// Fields are trimmed. Rows without coordinates, with a missing or
/// non-positive price, or that fail to decode are skipped with a warning.
/// When several rows share a station id, the lowest price wins. Stations
/// are returned ordered by id.
///
/// # Errors
///
/// Returns [`StationImportError::Csv`] when the header cannot be read or
/// the underlying reader fails.
pub fn read_stations_csv<R: Read>(
    reader: R,
) -> Result<(Vec<FuelStation>, ImportSummary), StationImportError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    csv_reader.headers()?;

    let mut summary = ImportSummary::default();
    let mut by_id: BTreeMap<u64, FuelStation> = BTreeMap::new();
    for (line, record) in (2_u64..).zip(csv_reader.deserialize::<StationRow>()) {
        let decoded = match record {
            Ok(row) => row.into_station(),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => Err(err.to_string()),
        };
        let station = match decoded {
            Ok(station) => station,
            Err(reason) => {
                log::warn!("skipping station CSV row {line}: {reason}");
                summary.skipped += 1;
                continue;
            }
        };
        match by_id.get_mut(&station.id) {
            Some(existing) => {
                summary.duplicates += 1;
                if station.price_per_gallon < existing.price_per_gallon {
                    *existing = station;
                }
            }
            None => {
                by_id.insert(station.id, station);
            }
        }
    }

    summary.imported = by_id.len();
    Ok((by_id.into_values().collect(), summary))
}

/// Read `csv_path` and replace the station table in `database_path`.
///
/// # Errors
///
/// Returns [`StationImportError::OpenCsv`] when the CSV cannot be opened,
/// [`StationImportError::PrepareDatabase`] when the database directory
/// cannot be created, and propagates decode and database failures.
pub fn import_stations_csv(
    csv_path: &Utf8Path,
    database_path: &Utf8Path,
) -> Result<ImportSummary, StationImportError> {
    let file = refuel_fs::open_utf8_file(csv_path).map_err(|source| StationImportError::OpenCsv {
        path: csv_path.to_owned(),
        source,
    })?;
    let (stations, summary) = read_stations_csv(file)?;
    refuel_fs::ensure_parent_dir(database_path).map_err(|source| {
        StationImportError::PrepareDatabase {
            path: database_path.to_owned(),
            source,
        }
    })?;
    write_stations_database(database_path, &stations)?;
    log::info!(
        "imported {} stations into {database_path} ({} skipped, {} duplicates)",
        summary.imported,
        summary.skipped,
        summary.duplicates
    );
    Ok(summary)
}
