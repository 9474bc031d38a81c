//! Data access for fuel stations.
//!
//! The `StationStore` trait defines a read-only interface for retrieving
//! [`FuelStation`] values inside a geographic bounding box. Planning uses it
//! to fetch the candidates within a route's corridor before projection.

use geo::Rect;

use crate::{FuelStation, NearbyStations, PlanError, ProjectedStation, RoutePolyline};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::StationIndex;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{
    SqliteStationStore, SqliteStationStoreError, STATIONS_TABLE, write_stations_database,
};

/// Read-only access to persisted fuel stations.
///
/// The bounding box uses WGS84 coordinates (`x = longitude`,
/// `y = latitude`). Regions crossing the antimeridian are not modelled;
/// callers must split such areas into two queries. Containment includes
/// boundary points. Results are ordered by station id.
pub trait StationStore {
    /// Return all stations inside `bbox`.
    fn stations_in_rect(&self, bbox: &Rect<f64>)
    -> Box<dyn Iterator<Item = FuelStation> + Send + '_>;
}

impl<T: StationStore + ?Sized> StationStore for &T {
    fn stations_in_rect(
        &self,
        bbox: &Rect<f64>,
    ) -> Box<dyn Iterator<Item = FuelStation> + Send + '_> {
        (**self).stations_in_rect(bbox)
    }
}

/// Fetch the stations inside a route's corridor and project them.
///
/// # Errors
///
/// Propagates projection failures from
/// [`filter_stations_near_route`](crate::filter_stations_near_route).
pub fn stations_near_route<S: StationStore + ?Sized>(
    store: &S,
    route: &RoutePolyline,
    max_corridor_km: f64,
) -> Result<Vec<ProjectedStation>, PlanError> {
    let candidates = candidate_stations(store, route, max_corridor_km);
    crate::filter_stations_near_route(route, &candidates, max_corridor_km)
}

/// Stations whose position falls in the corridor rectangle of `route`.
#[must_use]
pub fn candidate_stations<S: StationStore + ?Sized>(
    store: &S,
    route: &RoutePolyline,
    max_corridor_km: f64,
) -> Vec<FuelStation> {
    store
        .stations_in_rect(&route.corridor_rect(max_corridor_km.max(0.0)))
        .collect()
}

/// Filter-only report for the stations of a store near `route`.
///
/// # Errors
///
/// See [`stations_near_route`].
pub fn nearby_stations_from_store<S: StationStore + ?Sized>(
    store: &S,
    route: &RoutePolyline,
    max_corridor_km: f64,
) -> Result<NearbyStations, PlanError> {
    Ok(NearbyStations {
        route_miles: route.total_miles(),
        max_corridor_km,
        stations: stations_near_route(store, route, max_corridor_km)?,
    })
}
