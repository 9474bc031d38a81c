//! Core domain types for the refuelling planner.
//!
//! The crate holds everything a solver needs and nothing it does not: route
//! geometry, fuel stations, the vehicle model, the projector that places
//! stations along a route, the [`FuelSolver`] contract and the plan
//! assembler. Collaborators that talk to the outside world (route
//! providers, geocoders, station stores) are described by traits here and
//! implemented elsewhere.
//!
//! Constructors validate their input and return `Result` so bad data is
//! rejected before any solver runs.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod geocoding;
mod plan;
mod planner;
pub mod projection;
pub mod route;
pub mod routing;
mod solver;
mod station;
pub mod store;
#[doc(hidden)]
pub mod test_support;
mod vehicle;

pub use error::PlanError;
pub use plan::{NearbyStations, Plan, PlanStop, StationReport, assemble_plan};
pub use planner::{PlanOptions, nearby_stations, plan_route_with};
pub use projection::{RouteProjection, filter_stations_near_route, project_point};
pub use route::RoutePolyline;
pub use solver::{Algorithm, FUEL_EPSILON, FuelSolver, ParseAlgorithmError, Refuel, SolveInput};
pub use station::{FuelStation, ProjectedStation, StationError};
pub use vehicle::{DEFAULT_MILES_PER_GALLON, DEFAULT_TANK_CAPACITY_GALLONS, VehicleProfile};
