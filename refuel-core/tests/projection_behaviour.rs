//! Behavioural tests for corridor filtering using rstest-bdd.

use std::cell::RefCell;

use geo::Coord;
use refuel_core::test_support::station_at;
use refuel_core::{FuelStation, PlanError, ProjectedStation, RoutePolyline, filter_stations_near_route};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct ProjectionWorld {
    route: RefCell<Option<RoutePolyline>>,
    stations: RefCell<Vec<FuelStation>>,
    result: RefCell<Option<Result<Vec<ProjectedStation>, PlanError>>>,
}

#[fixture]
fn world() -> ProjectionWorld {
    ProjectionWorld::default()
}

#[given("a 69 mile route running east along the equator")]
fn given_route(world: &ProjectionWorld) {
    let route = RoutePolyline::new(
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }],
        vec![0.0, 69.0],
    )
    .expect("valid route");
    world.route.replace(Some(route));
}

#[given("stations beside the route at its far end, its start and its middle")]
fn given_stations_beside_route(world: &ProjectionWorld) {
    world.stations.replace(vec![
        station_at(30, Coord { x: 0.95, y: 0.01 }, 3.10),
        station_at(10, Coord { x: 0.02, y: -0.01 }, 3.40),
        station_at(20, Coord { x: 0.5, y: 0.02 }, 3.25),
    ]);
}

#[given("a station 50 km north of the route")]
fn given_distant_station(world: &ProjectionWorld) {
    world
        .stations
        .replace(vec![station_at(1, Coord { x: 0.5, y: 0.45 }, 2.99)]);
}

#[when("I filter the stations within {corridor} km of the route")]
fn when_filter(world: &ProjectionWorld, corridor: f64) {
    let route = world.route.borrow();
    let route = route.as_ref().expect("route configured");
    let result = filter_stations_near_route(route, &world.stations.borrow(), corridor);
    world.result.replace(Some(result));
}

#[then("the stations are returned in the order start, middle, far end")]
fn then_route_order(world: &ProjectionWorld) {
    let result = world.result.borrow();
    let projected = result
        .as_ref()
        .expect("filter ran")
        .as_ref()
        .expect("filter succeeded");
    let ids: Vec<_> = projected.iter().map(ProjectedStation::id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    let miles: Vec<_> = projected
        .iter()
        .map(|station| station.distance_along_route_miles)
        .collect();
    assert!(miles.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(projected.iter().all(|station| station.distance_from_route_km <= 5.0));
}

#[then("no stations are returned")]
fn then_empty(world: &ProjectionWorld) {
    let result = world.result.borrow();
    let projected = result
        .as_ref()
        .expect("filter ran")
        .as_ref()
        .expect("filter succeeded");
    assert!(projected.is_empty());
}

#[then("the filter fails with invalid parameters")]
fn then_invalid(world: &ProjectionWorld) {
    let result = world.result.borrow();
    assert!(matches!(
        result.as_ref().expect("filter ran"),
        Err(PlanError::InvalidParameters {
            parameter: "max_corridor_km",
            ..
        })
    ));
}

#[scenario(path = "tests/features/projection.feature", index = 0)]
fn corridor_keeps_route_order(world: ProjectionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/projection.feature", index = 1)]
fn corridor_drops_distant_stations(world: ProjectionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/projection.feature", index = 2)]
fn negative_corridor_is_rejected(world: ProjectionWorld) {
    let _ = world;
}
