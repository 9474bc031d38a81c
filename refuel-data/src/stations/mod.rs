//! Station price list import.
//!
//! Price lists arrive as OPIS-style CSV exports with one row per truck
//! stop. [`read_stations_csv`] validates the rows into
//! [`FuelStation`](refuel_core::FuelStation) values and
//! [`import_stations_csv`] writes them into the SQLite station store read by
//! [`SqliteStationStore`](refuel_core::store::SqliteStationStore).

mod csv_import;

pub use csv_import::{ImportSummary, StationImportError, import_stations_csv, read_stations_csv};
