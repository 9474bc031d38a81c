//! Behavioural tests for `SqliteStationStore` using rstest-bdd.

use std::cell::RefCell;
use std::path::PathBuf;

use geo::Coord;
use refuel_core::store::{
    SqliteStationStore, SqliteStationStoreError, stations_near_route, write_stations_database,
};
use refuel_core::test_support::{station_at, straight_route};
use refuel_core::ProjectedStation;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// Shared state for SQLite store scenarios.
#[derive(Debug)]
struct StoreWorld {
    temp_dir: TempDir,
    store: RefCell<Option<SqliteStationStore>>,
    error: RefCell<Option<SqliteStationStoreError>>,
    results: RefCell<Vec<ProjectedStation>>,
}

impl StoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store: RefCell::new(None),
            error: RefCell::new(None),
            results: RefCell::new(Vec::new()),
        }
    }

    fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("stations.db")
    }
}

#[fixture]
fn world() -> StoreWorld {
    StoreWorld::new()
}

#[given("a SQLite database holding stations along and away from the route")]
fn given_database(world: &StoreWorld) {
    let stations = vec![
        station_at(1, Coord { x: 0.25, y: 0.01 }, 3.49),
        station_at(2, Coord { x: 0.75, y: -0.02 }, 3.19),
        station_at(3, Coord { x: 0.5, y: 2.0 }, 2.89),
    ];
    write_stations_database(world.database_path(), &stations).expect("persist stations");
}

#[given("no SQLite database has been written")]
fn given_no_database(world: &StoreWorld) {
    assert!(!world.database_path().exists());
}

#[when("I open the SQLite station store")]
fn when_open(world: &StoreWorld) {
    match SqliteStationStore::open(world.database_path()) {
        Ok(store) => {
            world.store.replace(Some(store));
        }
        Err(err) => {
            world.error.replace(Some(err));
        }
    }
}

#[when("I look up stations near a 69 mile equatorial route")]
fn when_lookup(world: &StoreWorld) {
    let store = world.store.borrow();
    let store = store.as_ref().expect("store opened");
    let found = stations_near_route(store, &straight_route(69.0), 5.0).expect("projection");
    world.results.replace(found);
}

#[then("only the stations along the route are returned")]
fn then_route_stations(world: &StoreWorld) {
    let ids: Vec<_> = world.results.borrow().iter().map(ProjectedStation::id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[then("opening the store fails with an open database error")]
fn then_open_error(world: &StoreWorld) {
    assert!(matches!(
        world.error.borrow().as_ref(),
        Some(SqliteStationStoreError::OpenDatabase { .. })
    ));
}

#[scenario(path = "tests/features/sqlite_station_store.feature", index = 0)]
fn persisted_stations_near_route(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_station_store.feature", index = 1)]
fn missing_database_fails(world: StoreWorld) {
    let _ = world;
}
