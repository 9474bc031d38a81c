//! Deterministic fixtures and collaborator doubles for unit and behaviour
//! tests.
//!
//! The module is compiled unconditionally so sibling crates can use it from
//! their own tests; it is hidden from the public documentation.
#![expect(
    clippy::expect_used,
    reason = "fixtures fail loudly on invalid literals"
)]

use geo::Coord;

use crate::geocoding::{GeocodeError, Geocoder, Place};
use crate::routing::{RouteError, RouteProvider};
use crate::{FuelStation, ProjectedStation, RoutePolyline};

/// A two-point route along the equator whose length is `miles`.
///
/// # Panics
///
/// Panics when `miles` is not positive.
#[must_use]
pub fn straight_route(miles: f64) -> RoutePolyline {
    RoutePolyline::new(
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }],
        vec![0.0, miles],
    )
    .expect("straight test route must be valid")
}

/// A station at `location` named after its id.
///
/// # Panics
///
/// Panics when `price` is not positive.
#[must_use]
pub fn station_at(id: u64, location: Coord<f64>, price: f64) -> FuelStation {
    FuelStation::new(id, format!("Station {id}"), "", location, price)
        .expect("test station must be valid")
}

/// A station already projected onto a route at `miles`.
///
/// # Panics
///
/// Panics when `price` is not positive.
#[must_use]
pub fn projected_station(id: u64, miles: f64, price: f64) -> ProjectedStation {
    ProjectedStation {
        station: station_at(id, Coord { x: 0.0, y: 0.0 }, price),
        distance_along_route_miles: miles,
        distance_from_route_km: 0.0,
    }
}

/// Project a list of `(miles, price)` pairs, numbering stations from one.
#[must_use]
pub fn projected_stations(specs: &[(f64, f64)]) -> Vec<ProjectedStation> {
    specs
        .iter()
        .zip(1_u64..)
        .map(|(&(miles, price), id)| projected_station(id, miles, price))
        .collect()
}

/// `RouteProvider` returning a canned answer for every request.
#[derive(Debug, Clone)]
pub struct StubRouteProvider {
    response: Result<RoutePolyline, RouteError>,
}

impl StubRouteProvider {
    /// Always answer with `route`.
    #[must_use]
    pub const fn with_route(route: RoutePolyline) -> Self {
        Self {
            response: Ok(route),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn with_error(error: RouteError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl RouteProvider for StubRouteProvider {
    fn route(&self, _start: Coord<f64>, _end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        self.response.clone()
    }
}

/// `Geocoder` returning a canned answer for every query.
#[derive(Debug, Clone)]
pub struct StubGeocoder {
    response: Result<Vec<Place>, GeocodeError>,
}

impl StubGeocoder {
    /// Always answer with `places`.
    #[must_use]
    pub const fn with_places(places: Vec<Place>) -> Self {
        Self {
            response: Ok(places),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn with_error(error: GeocodeError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        if query.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        self.response.clone()
    }
}
