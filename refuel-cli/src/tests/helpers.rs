//! Test helpers for writing request files and station stores.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use refuel_core::store::write_stations_database;
use refuel_core::test_support::station_at;
use refuel_core::{Algorithm, FuelStation};
use serde_json::json;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A scratch directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

/// Write a plan request with coordinate-literal endpoints.
pub(super) fn write_request(
    path: &Utf8Path,
    start: &str,
    algorithm: Algorithm,
    initial_fuel_gallons: Option<f64>,
) {
    let request = json!({
        "start": start,
        "end": "0,1",
        "algorithm": algorithm,
        "initial_fuel_gallons": initial_fuel_gallons,
    });
    let payload = serde_json::to_string_pretty(&request).expect("serialize request");
    write_utf8(path, payload.as_bytes());
}

/// Stations on the equator placed so that they project onto a
/// `test_support::straight_route(route_miles)` at the given miles.
pub(super) fn stations_along(route_miles: f64, specs: &[(f64, f64)]) -> Vec<FuelStation> {
    specs
        .iter()
        .zip(1_u64..)
        .map(|(&(miles, price), id)| {
            station_at(
                id,
                Coord {
                    x: miles / route_miles,
                    y: 0.0,
                },
                price,
            )
        })
        .collect()
}

pub(super) fn write_stations(path: &Utf8Path, stations: &[FuelStation]) {
    write_stations_database(path.as_std_path(), stations).expect("write station store");
}
