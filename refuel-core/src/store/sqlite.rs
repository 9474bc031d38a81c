//! SQLite-backed station store.
//!
//! Stations live in a single table; opening the store loads every row into
//! a [`StationIndex`] so corridor queries never touch the database.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::{Coord, Rect};
use rusqlite::{Connection, OpenFlags, params};
use thiserror::Error;

use crate::{FuelStation, StationError};

use super::{StationIndex, StationStore};

/// Table holding persisted stations.
pub const STATIONS_TABLE: &str = "fuel_stations";

/// Error raised when reading or writing persisted stations.
#[derive(Debug, Error)]
pub enum SqliteStationStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored row violated station invariants.
    #[error("stored station is invalid: {0}")]
    InvalidStation(#[from] StationError),
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only station store loaded from SQLite.
pub struct SqliteStationStore {
    index: StationIndex,
}

impl fmt::Debug for SqliteStationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStationStore")
            .field("entries", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl SqliteStationStore {
    /// Open the database read-only and index every station.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStationStoreError::OpenDatabase`] when the file cannot
    /// be opened, [`SqliteStationStoreError::Database`] for query failures
    /// and [`SqliteStationStoreError::InvalidStation`] for rows with a bad
    /// price or location.
    pub fn open(database_path: impl AsRef<Path>) -> Result<Self, SqliteStationStoreError> {
        let database_path = database_path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| SqliteStationStoreError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;
        let stations = load_stations(&connection)?;
        log::debug!(
            "loaded {} stations from {}",
            stations.len(),
            database_path.display()
        );
        Ok(Self {
            index: StationIndex::new(stations),
        })
    }

    /// Number of stations loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the database held no stations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Give up the store and keep its in-memory index.
    #[must_use]
    pub fn into_index(self) -> StationIndex {
        self.index
    }
}

impl StationStore for SqliteStationStore {
    fn stations_in_rect(
        &self,
        bbox: &Rect<f64>,
    ) -> Box<dyn Iterator<Item = FuelStation> + Send + '_> {
        self.index.stations_in_rect(bbox)
    }
}

/// Create or replace the stations table at `path` with `stations`.
///
/// The write happens in one transaction.
///
/// # Errors
///
/// Returns [`SqliteStationStoreError::OpenDatabase`] when the file cannot be
/// created and [`SqliteStationStoreError::Database`] for write failures.
pub fn write_stations_database(
    path: impl AsRef<Path>,
    stations: &[FuelStation],
) -> Result<(), SqliteStationStoreError> {
    let path = path.as_ref();
    let mut connection =
        Connection::open(path).map_err(|source| SqliteStationStoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
    let transaction = connection.transaction()?;
    transaction.execute_batch(&format!(
        "DROP TABLE IF EXISTS {STATIONS_TABLE};
         CREATE TABLE {STATIONS_TABLE} (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL,
             address TEXT NOT NULL,
             lon REAL NOT NULL,
             lat REAL NOT NULL,
             price_per_gallon REAL NOT NULL
         );"
    ))?;
    {
        let mut insert = transaction.prepare(&format!(
            "INSERT INTO {STATIONS_TABLE} (id, name, address, lon, lat, price_per_gallon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ))?;
        for station in stations {
            insert.execute(params![
                station.id,
                station.name,
                station.address,
                station.location.x,
                station.location.y,
                station.price_per_gallon,
            ])?;
        }
    }
    transaction.commit()?;
    Ok(())
}

fn load_stations(connection: &Connection) -> Result<Vec<FuelStation>, SqliteStationStoreError> {
    let mut statement = connection.prepare(&format!(
        "SELECT id, name, address, lon, lat, price_per_gallon FROM {STATIONS_TABLE} ORDER BY id"
    ))?;
    let mut rows = statement.query([])?;
    let mut stations = Vec::new();
    while let Some(row) = rows.next()? {
        let id: u64 = row.get(0)?;
        let name: String = row.get(1)?;
        let address: String = row.get(2)?;
        let lon: f64 = row.get(3)?;
        let lat: f64 = row.get(4)?;
        let price: f64 = row.get(5)?;
        stations.push(FuelStation::new(
            id,
            name,
            address,
            Coord { x: lon, y: lat },
            price,
        )?);
    }
    Ok(stations)
}
