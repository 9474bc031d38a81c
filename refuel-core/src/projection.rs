//! Geometry projector: positions stations along a route.
//!
//! Each station is snapped to the nearest point on the polyline using a
//! local equirectangular approximation around the station. Stations outside
//! the corridor are dropped and the rest are ordered by distance along the
//! route, lateral offset, price and identifier.

use std::cmp::Ordering;

use geo::{Coord, Intersects};

use crate::route::{KM_PER_DEGREE, RouteSegment};
use crate::{FuelStation, PlanError, ProjectedStation, RoutePolyline};

/// Corridor width used when callers do not choose one.
pub const DEFAULT_MAX_CORRIDOR_KM: f64 = 5.0;

/// Nearest point on the route for a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProjection {
    /// Road distance from the start to the projected point, in miles.
    pub distance_along_route_miles: f64,
    /// Lateral offset from the route, in kilometres.
    pub distance_from_route_km: f64,
}

/// Project `location` onto the nearest segment of `route`.
///
/// When several segments are equally close the earliest one wins.
#[must_use]
pub fn project_point(route: &RoutePolyline, location: Coord<f64>) -> RouteProjection {
    let mut best = RouteProjection {
        distance_along_route_miles: 0.0,
        distance_from_route_km: f64::INFINITY,
    };
    for segment in route.segments() {
        let (distance_km, t) = distance_to_segment_km(location, &segment);
        if distance_km < best.distance_from_route_km {
            best = RouteProjection {
                distance_along_route_miles: segment.start_miles
                    + t * (segment.end_miles - segment.start_miles),
                distance_from_route_km: distance_km,
            };
        }
    }
    best
}

/// Keep stations within `max_corridor_km` of the route, projected and sorted.
///
/// # Errors
///
/// Returns [`PlanError::InvalidGeometry`] when the route has fewer than two
/// points, [`PlanError::InvalidParameters`] when the corridor is negative or
/// not finite or a station has an invalid price or location.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use refuel_core::{FuelStation, RoutePolyline, filter_stations_near_route};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let route = RoutePolyline::new(
///     vec![Coord { x: -100.0, y: 40.0 }, Coord { x: -99.0, y: 40.0 }],
///     vec![0.0, 53.0],
/// )?;
/// let near = FuelStation::new(1, "Near", "", Coord { x: -99.5, y: 40.01 }, 3.2)?;
/// let far = FuelStation::new(2, "Far", "", Coord { x: -99.5, y: 41.0 }, 2.9)?;
///
/// let projected = filter_stations_near_route(&route, &[near, far], 5.0)?;
/// assert_eq!(projected.len(), 1);
/// assert!((projected[0].distance_along_route_miles - 26.5).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
pub fn filter_stations_near_route(
    route: &RoutePolyline,
    stations: &[FuelStation],
    max_corridor_km: f64,
) -> Result<Vec<ProjectedStation>, PlanError> {
    if route.points().len() < 2 {
        return Err(PlanError::InvalidGeometry {
            reason: "route needs at least two points",
        });
    }
    if !(max_corridor_km.is_finite() && max_corridor_km >= 0.0) {
        return Err(PlanError::invalid(
            "max_corridor_km",
            "must be a non-negative distance",
        ));
    }

    let corridor = route.corridor_rect(max_corridor_km);
    let mut projected = Vec::new();
    for station in stations {
        station.validate().map_err(|_| {
            PlanError::invalid("stations", "prices must be positive and locations valid")
        })?;
        if !corridor.intersects(&station.location) {
            continue;
        }
        let projection = project_point(route, station.location);
        if projection.distance_from_route_km <= max_corridor_km {
            projected.push(ProjectedStation {
                station: station.clone(),
                distance_along_route_miles: projection.distance_along_route_miles,
                distance_from_route_km: projection.distance_from_route_km,
            });
        }
    }
    projected.sort_by(compare_projected);

    log::debug!(
        "kept {} of {} stations within {max_corridor_km} km of a {:.1} mile route",
        projected.len(),
        stations.len(),
        route.total_miles()
    );
    Ok(projected)
}

/// Deterministic ordering for projected stations.
#[must_use]
pub fn compare_projected(a: &ProjectedStation, b: &ProjectedStation) -> Ordering {
    a.distance_along_route_miles
        .total_cmp(&b.distance_along_route_miles)
        .then(a.distance_from_route_km.total_cmp(&b.distance_from_route_km))
        .then(a.price().total_cmp(&b.price()))
        .then(a.id().cmp(&b.id()))
}

/// Distance in km from `point` to the segment and the clamped projection
/// parameter along it.
fn distance_to_segment_km(point: Coord<f64>, segment: &RouteSegment) -> (f64, f64) {
    let km_per_lon_degree = KM_PER_DEGREE * point.y.to_radians().cos();
    let to_plane = |coord: Coord<f64>| {
        (
            (coord.x - point.x) * km_per_lon_degree,
            (coord.y - point.y) * KM_PER_DEGREE,
        )
    };
    let (ax, ay) = to_plane(segment.start);
    let (bx, by) = to_plane(segment.end);
    let (dx, dy) = (bx - ax, by - ay);
    let length_squared = dx * dx + dy * dy;
    let t = if length_squared > 0.0 {
        (-(ax * dx + ay * dy) / length_squared).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (cx.hypot(cy), t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn station(id: u64, x: f64, y: f64, price: f64) -> FuelStation {
        FuelStation::new(id, format!("Station {id}"), "", Coord { x, y }, price)
            .expect("valid station")
    }

    /// An east-west route along the equator, 100 miles long.
    #[fixture]
    fn equator_route() -> RoutePolyline {
        RoutePolyline::new(
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 0.5, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
            ],
            vec![0.0, 50.0, 100.0],
        )
        .expect("valid route")
    }

    #[rstest]
    fn interpolates_along_the_nearest_segment(equator_route: RoutePolyline) {
        let projection = project_point(&equator_route, Coord { x: 0.75, y: 0.01 });
        assert!((projection.distance_along_route_miles - 75.0).abs() < 1e-9);
        assert!((projection.distance_from_route_km - 1.11).abs() < 1e-9);
    }

    #[rstest]
    fn clamps_points_beyond_the_ends(equator_route: RoutePolyline) {
        let before = project_point(&equator_route, Coord { x: -0.01, y: 0.0 });
        let after = project_point(&equator_route, Coord { x: 1.02, y: 0.0 });
        assert_eq!(before.distance_along_route_miles, 0.0);
        assert_eq!(after.distance_along_route_miles, 100.0);
        assert!((after.distance_from_route_km - 2.22).abs() < 1e-9);
    }

    #[rstest]
    fn drops_stations_outside_the_corridor(equator_route: RoutePolyline) {
        let stations = vec![
            station(1, 0.2, 0.03, 3.0),
            station(2, 0.4, 0.06, 3.0),
            station(3, 5.0, 5.0, 3.0),
        ];
        let projected =
            filter_stations_near_route(&equator_route, &stations, 5.0).expect("projection");
        let ids: Vec<_> = projected.iter().map(ProjectedStation::id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[rstest]
    fn orders_ties_by_price_then_id(equator_route: RoutePolyline) {
        let stations = vec![
            station(4, 0.3, 0.01, 3.5),
            station(3, 0.3, 0.01, 3.5),
            station(2, 0.3, 0.01, 3.1),
            station(1, 0.3, -0.01, 3.0),
        ];
        let projected =
            filter_stations_near_route(&equator_route, &stations, 5.0).expect("projection");
        let ids: Vec<_> = projected.iter().map(ProjectedStation::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn closer_station_wins_a_distance_tie() {
        let at = |id, offset_km, price| ProjectedStation {
            station: station(id, 0.0, 0.0, price),
            distance_along_route_miles: 30.0,
            distance_from_route_km: offset_km,
        };
        let near_expensive = at(9, 0.5, 4.0);
        let far_cheap = at(1, 2.0, 3.0);
        assert_eq!(compare_projected(&near_expensive, &far_cheap), Ordering::Less);
    }

    #[rstest]
    fn keeps_stations_in_route_order(equator_route: RoutePolyline) {
        let stations = vec![station(1, 0.9, 0.0, 3.0), station(2, 0.1, 0.0, 4.0)];
        let projected =
            filter_stations_near_route(&equator_route, &stations, 1.0).expect("projection");
        assert_eq!(projected[0].id(), 2);
        assert!(projected[0].distance_along_route_miles < projected[1].distance_along_route_miles);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_invalid_corridor(equator_route: RoutePolyline, #[case] corridor: f64) {
        let err = filter_stations_near_route(&equator_route, &[], corridor)
            .expect_err("corridor should be rejected");
        assert!(matches!(err, PlanError::InvalidParameters { parameter: "max_corridor_km", .. }));
    }

    #[rstest]
    fn rejects_stations_with_invalid_prices(equator_route: RoutePolyline) {
        let mut bad = station(1, 0.5, 0.0, 3.0);
        bad.price_per_gallon = 0.0;
        let err = filter_stations_near_route(&equator_route, &[bad], 5.0)
            .expect_err("price should be rejected");
        assert!(matches!(err, PlanError::InvalidParameters { .. }));
    }
}
