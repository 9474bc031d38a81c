//! Tests for the `ExactSolver`.

use super::*;
use refuel_core::test_support::{projected_stations, straight_route};
use refuel_core::{Plan, VehicleProfile, assemble_plan};
use rstest::rstest;

fn plan(
    solver: &ExactSolver,
    miles: f64,
    stations: &[(f64, f64)],
    vehicle: VehicleProfile,
) -> Result<Plan, PlanError> {
    let route = straight_route(miles);
    let projected = projected_stations(stations);
    let input = SolveInput::new(&route, &projected, &vehicle).expect("valid input");
    let refuels = solver.solve(&input)?;
    Ok(assemble_plan(&input, solver.algorithm(), &refuels))
}

fn half_tank() -> VehicleProfile {
    VehicleProfile::new(20.0, 10.0, Some(10.0)).expect("valid vehicle")
}

#[rstest]
fn three_station_route_costs_seventy_one_dollars() {
    let result = plan(
        &ExactSolver::new(),
        300.0,
        &[(50.0, 4.0), (120.0, 3.5), (180.0, 4.5)],
        half_tank(),
    )
    .expect("feasible");

    assert!((result.total_cost - 71.0).abs() < 1e-6);
    let stops: Vec<_> = result
        .stops
        .iter()
        .map(|stop| (stop.station.id(), (stop.gallons_purchased * 100.0).round()))
        .collect();
    assert_eq!(stops, vec![(1, 200.0), (2, 1800.0)]);
    assert!(result.final_fuel_gallons.abs() < 1e-6);
}

#[rstest]
fn gap_beyond_tank_range_is_infeasible() {
    let full = VehicleProfile::new(20.0, 10.0, None).expect("valid vehicle");
    let err = plan(&ExactSolver::new(), 400.0, &[(100.0, 3.0), (350.0, 3.0)], full)
        .expect_err("250 mile gap");
    assert!(matches!(err, PlanError::NoFeasiblePath { .. }));
}

#[rstest]
#[case::zero_interval(DiscretizationConfig::default().with_interval_miles(0.0))]
#[case::zero_budget(DiscretizationConfig::default().with_max_states(0))]
fn invalid_discretization_is_rejected(#[case] config: DiscretizationConfig) {
    let err = plan(&ExactSolver::with_config(config), 100.0, &[], half_tank())
        .expect_err("invalid settings");
    assert!(matches!(err, PlanError::InvalidParameters { .. }));
}

#[rstest]
fn initial_fuel_between_round_amounts_is_used_in_full() {
    let vehicle = VehicleProfile::new(20.0, 10.0, Some(5.02)).expect("valid vehicle");
    let result = plan(&ExactSolver::new(), 50.1, &[], vehicle).expect("5.02 gal covers 50.1 mi");
    assert!(result.stops.is_empty());
    assert!((result.final_fuel_gallons - 0.01).abs() < 1e-9);
}

#[rstest]
fn gap_of_exactly_one_tank_is_feasible() {
    let vehicle = VehicleProfile::new(20.0, 10.0, Some(1.0)).expect("valid vehicle");
    let result = plan(&ExactSolver::new(), 200.3, &[(0.3, 3.0)], vehicle)
        .expect("a full tank at mile 0.3 reaches mile 200.3");
    assert_eq!(result.fuel_stops_count(), 1);
    assert!((result.stops[0].gallons_purchased - 19.03).abs() < 1e-9);
    assert!(result.final_fuel_gallons.abs() < 1e-9);
}

#[rstest]
fn buys_only_the_fuel_the_trip_needs() {
    let empty = VehicleProfile::new(20.0, 10.0, Some(0.0)).expect("valid vehicle");
    let result = plan(&ExactSolver::new(), 199.97, &[(0.0, 3.0)], empty).expect("feasible");
    assert!((result.stops[0].gallons_purchased - 19.997).abs() < 1e-9);
    assert!((result.total_cost - 59.991).abs() < 1e-6);
}

#[rstest]
#[case::offset_station(200.3, &[(0.3, 3.0)], Some(1.0))]
#[case::empty_start(199.97, &[(0.0, 3.0)], Some(0.0))]
#[case::uneven_layout(
    512.7,
    &[(33.3, 3.1), (151.9, 3.7), (210.4, 2.9), (377.7, 3.3), (455.0, 3.8)],
    Some(7.3)
)]
#[case::three_stations(300.0, &[(50.0, 4.0), (120.0, 3.5), (180.0, 4.5)], Some(10.0))]
fn never_costs_more_than_the_greedy_plan(
    #[case] miles: f64,
    #[case] stations: &[(f64, f64)],
    #[case] initial: Option<f64>,
) {
    use refuel_solver_greedy::GreedySolver;

    let vehicle = VehicleProfile::new(20.0, 10.0, initial).expect("valid vehicle");
    let route = straight_route(miles);
    let projected = projected_stations(stations);
    let input = SolveInput::new(&route, &projected, &vehicle).expect("valid input");
    let greedy = GreedySolver::new();
    let heuristic = assemble_plan(
        &input,
        greedy.algorithm(),
        &greedy.solve(&input).expect("greedy plan"),
    );
    let exact = plan(&ExactSolver::new(), miles, stations, vehicle).expect("exact plan");
    assert!(exact.total_cost <= heuristic.total_cost + 1e-6);
}

#[rstest]
fn prefers_fewer_stops_when_costs_tie() {
    let empty = VehicleProfile::new(20.0, 10.0, Some(5.0)).expect("valid vehicle");
    let result = plan(
        &ExactSolver::new(),
        150.0,
        &[(20.0, 3.0), (40.0, 3.0), (60.0, 3.0)],
        empty,
    )
    .expect("feasible");
    assert_eq!(result.fuel_stops_count(), 1);
    assert!((result.total_cost - 30.0).abs() < 1e-6);
}

#[rstest]
#[case(50.0)]
#[case(25.0)]
#[case(5.0)]
#[case(1.0)]
fn cost_does_not_depend_on_the_grid(#[case] interval: f64) {
    let solver =
        ExactSolver::with_config(DiscretizationConfig::default().with_interval_miles(interval));
    let result = plan(
        &solver,
        333.3,
        &[(41.7, 3.89), (97.2, 3.42), (188.8, 3.61), (260.1, 3.15)],
        half_tank(),
    )
    .expect("feasible");
    let reference = plan(
        &ExactSolver::new(),
        333.3,
        &[(41.7, 3.89), (97.2, 3.42), (188.8, 3.61), (260.1, 3.15)],
        half_tank(),
    )
    .expect("feasible");
    assert!((result.total_cost - reference.total_cost).abs() < 1e-9);
}

#[rstest]
fn plans_never_run_dry_between_stops() {
    let result = plan(
        &ExactSolver::new(),
        512.7,
        &[(33.3, 3.1), (151.9, 3.7), (210.4, 2.9), (377.7, 3.3), (455.0, 3.8)],
        VehicleProfile::new(20.0, 10.0, Some(7.3)).expect("valid vehicle"),
    )
    .expect("feasible");
    assert!(result.stops.iter().all(|stop| stop.arrival_fuel_gallons >= -1e-9));
    assert!(result.stops.iter().all(|stop| stop.departure_fuel_gallons <= 20.0 + 1e-9));
    assert!(result.final_fuel_gallons >= -1e-9);
}

#[rstest]
fn solving_twice_gives_the_same_plan() {
    let stations = [(50.0, 4.0), (120.0, 3.5), (180.0, 4.5)];
    let first = plan(&ExactSolver::new(), 300.0, &stations, half_tank()).expect("feasible");
    let second = plan(&ExactSolver::new(), 300.0, &stations, half_tank()).expect("feasible");
    assert_eq!(first, second);
}
