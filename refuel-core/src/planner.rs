//! Planning entry points tying projection, solving and assembly together.

use crate::projection::DEFAULT_MAX_CORRIDOR_KM;
use crate::{
    Algorithm, FuelSolver, FuelStation, NearbyStations, Plan, PlanError, RoutePolyline,
    SolveInput, VehicleProfile, assemble_plan, filter_stations_near_route,
};

/// Caller-facing planning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlanOptions {
    /// Stations further than this from the route are ignored.
    pub max_corridor_km: f64,
    /// Strategy used to choose stops.
    pub algorithm: Algorithm,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            max_corridor_km: DEFAULT_MAX_CORRIDOR_KM,
            algorithm: Algorithm::default(),
        }
    }
}

impl PlanOptions {
    /// Override the corridor width.
    #[must_use]
    pub const fn with_max_corridor_km(mut self, max_corridor_km: f64) -> Self {
        self.max_corridor_km = max_corridor_km;
        self
    }

    /// Override the algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Plan the cheapest refuelling stops for `route` with a given solver.
///
/// Stations are projected onto the route and filtered by the corridor,
/// then `solver` picks purchases and the result is assembled into a
/// [`Plan`]. The function holds no state, so identical inputs produce
/// identical plans.
///
/// # Errors
///
/// Returns [`PlanError::InvalidGeometry`] for unusable routes,
/// [`PlanError::InvalidParameters`] for bad corridors or stations, and
/// whatever the solver reports (usually [`PlanError::NoFeasiblePath`]).
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use refuel_core::{
///     Algorithm, FuelSolver, FuelStation, PlanError, Refuel, RoutePolyline, SolveInput,
///     VehicleProfile, plan_route_with,
/// };
///
/// struct Coast;
///
/// impl FuelSolver for Coast {
///     fn algorithm(&self) -> Algorithm {
///         Algorithm::Greedy
///     }
///
///     fn solve(&self, _input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let route = RoutePolyline::new(
///     vec![Coord { x: -101.8, y: 35.2 }, Coord { x: -101.0, y: 35.2 }],
///     vec![0.0, 45.0],
/// )?;
/// let plan = plan_route_with(&route, &[], &VehicleProfile::default(), 5.0, &Coast)?;
/// assert_eq!(plan.total_cost, 0.0);
/// assert!((plan.final_fuel_gallons - 45.5).abs() < 1e-9);
/// # Ok::<(), PlanError>(())
/// ```
pub fn plan_route_with(
    route: &RoutePolyline,
    stations: &[FuelStation],
    vehicle: &VehicleProfile,
    max_corridor_km: f64,
    solver: &dyn FuelSolver,
) -> Result<Plan, PlanError> {
    let projected = filter_stations_near_route(route, stations, max_corridor_km)?;
    let input = SolveInput::new(route, &projected, vehicle)?;
    let refuels = solver.solve(&input)?;
    let plan = assemble_plan(&input, solver.algorithm(), &refuels);
    log::debug!(
        "{} plan over {:.1} mi: {} stops, ${:.2}",
        plan.algorithm,
        plan.route_miles,
        plan.fuel_stops_count(),
        plan.total_cost
    );
    Ok(plan)
}

/// Filter-only mode: every station within the corridor, in route order.
///
/// # Errors
///
/// See [`filter_stations_near_route`].
pub fn nearby_stations(
    route: &RoutePolyline,
    stations: &[FuelStation],
    max_corridor_km: f64,
) -> Result<NearbyStations, PlanError> {
    Ok(NearbyStations {
        route_miles: route.total_miles(),
        max_corridor_km,
        stations: filter_stations_near_route(route, stations, max_corridor_km)?,
    })
}
