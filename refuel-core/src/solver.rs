//! The shared contract of the refuelling solvers.

use std::fmt;
use std::str::FromStr;

use crate::{PlanError, ProjectedStation, RoutePolyline, VehicleProfile};

/// Slack tolerated when comparing fuel quantities and positions.
pub const FUEL_EPSILON: f64 = 1e-9;

/// Which refuelling strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Algorithm {
    /// Single forward pass with a bounded lookahead window.
    #[default]
    Greedy,
    /// Shortest path over position and fuel level; returns the minimum cost.
    #[cfg_attr(feature = "serde", serde(alias = "dijkstra"))]
    Exact,
}

impl Algorithm {
    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm `{0}` (expected `greedy` or `exact`)")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "exact" | "dijkstra" => Ok(Self::Exact),
            other => Err(ParseAlgorithmError(other.to_owned())),
        }
    }
}

/// Validated input shared by every solver.
///
/// Stations are sorted by distance along the route and lie within
/// `[0, route.total_miles()]`.
#[derive(Debug, Clone, Copy)]
pub struct SolveInput<'a> {
    route: &'a RoutePolyline,
    stations: &'a [ProjectedStation],
    vehicle: &'a VehicleProfile,
}

impl<'a> SolveInput<'a> {
    /// Bundle and check the solver inputs.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidParameters`] when stations are unsorted,
    /// positioned outside the route, or carry a non-positive price.
    pub fn new(
        route: &'a RoutePolyline,
        stations: &'a [ProjectedStation],
        vehicle: &'a VehicleProfile,
    ) -> Result<Self, PlanError> {
        let total = route.total_miles();
        let within_route = stations.iter().all(|projected| {
            (-FUEL_EPSILON..=total + FUEL_EPSILON).contains(&projected.distance_along_route_miles)
        });
        if !within_route {
            return Err(PlanError::invalid(
                "stations",
                "projected positions must lie on the route",
            ));
        }
        let sorted = stations.windows(2).all(|pair| match pair {
            [a, b] => a.distance_along_route_miles <= b.distance_along_route_miles,
            _ => true,
        });
        if !sorted {
            return Err(PlanError::invalid(
                "stations",
                "must be ordered by distance along the route",
            ));
        }
        if !stations
            .iter()
            .all(|projected| projected.price().is_finite() && projected.price() > 0.0)
        {
            return Err(PlanError::invalid("price_per_gallon", "must be positive"));
        }
        Ok(Self {
            route,
            stations,
            vehicle,
        })
    }

    /// Route being planned.
    #[must_use]
    pub const fn route(&self) -> &'a RoutePolyline {
        self.route
    }

    /// Candidate stations in route order.
    #[must_use]
    pub const fn stations(&self) -> &'a [ProjectedStation] {
        self.stations
    }

    /// Vehicle parameters.
    #[must_use]
    pub const fn vehicle(&self) -> &'a VehicleProfile {
        self.vehicle
    }

    /// Route length in miles.
    #[must_use]
    pub fn route_miles(&self) -> f64 {
        self.route.total_miles()
    }
}

/// A single purchase chosen by a solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refuel {
    /// Index into [`SolveInput::stations`].
    pub station_index: usize,
    /// Gallons bought at that station.
    pub gallons: f64,
}

/// Produce a refuelling decision sequence for a route.
///
/// Implementations must return purchases in route order and either a
/// complete, fuel-feasible sequence or an error. Solvers must be
/// `Send + Sync` so a single instance can serve concurrent requests.
///
/// # Examples
///
/// ```rust
/// use refuel_core::{Algorithm, FuelSolver, PlanError, Refuel, SolveInput};
///
/// /// Never buys anything; fine for routes within the initial range.
/// struct Coast;
///
/// impl FuelSolver for Coast {
///     fn algorithm(&self) -> Algorithm {
///         Algorithm::Greedy
///     }
///
///     fn solve(&self, input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError> {
///         if input.vehicle().initial_range_miles() >= input.route_miles() {
///             Ok(Vec::new())
///         } else {
///             Err(PlanError::no_feasible_path())
///         }
///     }
/// }
/// ```
pub trait FuelSolver: Send + Sync {
    /// Strategy reported in the resulting plan.
    fn algorithm(&self) -> Algorithm;

    /// Choose where to refuel and how much to buy.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoFeasiblePath`] when the destination cannot be
    /// reached and [`PlanError::InvalidParameters`] for unusable tuning.
    fn solve(&self, input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError>;
}

impl<T: FuelSolver + ?Sized> FuelSolver for Box<T> {
    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn solve(&self, input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError> {
        (**self).solve(input)
    }
}
