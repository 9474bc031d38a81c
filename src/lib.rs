//! Facade crate for the refuelling planner.
//!
//! Given a route, the stations near it, and a vehicle, the planner chooses
//! where to stop and how much fuel to buy so the trip costs as little as
//! possible. Two strategies are available behind feature flags:
//!
//! - `solver-greedy`: a single forward pass that is fast and usually good.
//! - `solver-exact`: Dijkstra over route positions and exact fuel levels
//!   that returns the minimum cost.
//!
//! ```rust
//! use geo::Coord;
//! use refuel_engine::{Algorithm, FuelStation, RoutePolyline, VehicleProfile, plan_route};
//!
//! let route = RoutePolyline::new(
//!     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }],
//!     vec![0.0, 300.0],
//! )?;
//! let stations = [(1, 50.0, 4.00), (2, 120.0, 3.50), (3, 180.0, 4.50)]
//!     .into_iter()
//!     .map(|(id, miles, price)| {
//!         let location = Coord { x: miles / 300.0, y: 0.0 };
//!         FuelStation::new(id, format!("Stop {id}"), "", location, price)
//!     })
//!     .collect::<Result<Vec<_>, _>>()?;
//! let vehicle = VehicleProfile::new(20.0, 10.0, Some(10.0))?;
//!
//! let plan = plan_route(&route, &stations, &vehicle, Algorithm::Exact)?;
//! assert!((plan.total_cost - 71.0).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub use refuel_core::projection::DEFAULT_MAX_CORRIDOR_KM;
pub use refuel_core::{
    Algorithm, FuelSolver, FuelStation, NearbyStations, Plan, PlanError, PlanOptions, PlanStop,
    ProjectedStation, Refuel, RoutePolyline, SolveInput, StationReport, VehicleProfile,
    assemble_plan, filter_stations_near_route, nearby_stations, plan_route_with,
};

#[cfg(feature = "store-sqlite")]
pub use refuel_core::store::{SqliteStationStore, SqliteStationStoreError};

#[cfg(feature = "solver-exact")]
pub use refuel_solver_exact::{DiscretizationConfig, ExactSolver};

#[cfg(feature = "solver-greedy")]
pub use refuel_solver_greedy::GreedySolver;

/// Plan the cheapest stops along `route` within the default corridor.
///
/// # Errors
///
/// Returns [`PlanError::InvalidGeometry`] for unusable routes,
/// [`PlanError::InvalidParameters`] for bad stations or a solver that was
/// not compiled in, and [`PlanError::NoFeasiblePath`] when some gap is
/// longer than a full tank can cover.
pub fn plan_route(
    route: &RoutePolyline,
    stations: &[FuelStation],
    vehicle: &VehicleProfile,
    algorithm: Algorithm,
) -> Result<Plan, PlanError> {
    plan_route_with_options(
        route,
        stations,
        vehicle,
        PlanOptions::default().with_algorithm(algorithm),
    )
}

/// Plan with an explicit corridor and algorithm.
///
/// # Errors
///
/// See [`plan_route`].
pub fn plan_route_with_options(
    route: &RoutePolyline,
    stations: &[FuelStation],
    vehicle: &VehicleProfile,
    options: PlanOptions,
) -> Result<Plan, PlanError> {
    let solver = solver_for(options.algorithm)?;
    plan_route_with(
        route,
        stations,
        vehicle,
        options.max_corridor_km,
        solver.as_ref(),
    )
}

/// The default-configured solver for `algorithm`.
///
/// # Errors
///
/// Returns [`PlanError::InvalidParameters`] when the matching solver
/// feature is disabled.
pub fn solver_for(algorithm: Algorithm) -> Result<Box<dyn FuelSolver>, PlanError> {
    match algorithm {
        #[cfg(feature = "solver-exact")]
        Algorithm::Exact => Ok(Box::new(ExactSolver::new())),
        #[cfg(feature = "solver-greedy")]
        Algorithm::Greedy => Ok(Box::new(GreedySolver::new())),
        #[cfg(not(all(feature = "solver-exact", feature = "solver-greedy")))]
        _ => Err(PlanError::invalid(
            "algorithm",
            "the requested solver is not compiled in",
        )),
    }
}
