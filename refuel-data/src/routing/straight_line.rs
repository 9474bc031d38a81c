//! Offline route provider drawing a straight chord between the endpoints.

use geo::Coord;
use refuel_core::RoutePolyline;
use refuel_core::route::{KM_PER_MILE, haversine_miles};
use refuel_core::routing::{RouteError, RouteProvider};

/// Default distance between interpolated points.
pub const DEFAULT_SPACING_KM: f64 = 10.0;

/// Route provider that interpolates points along the chord from start to
/// end, one every [`DEFAULT_SPACING_KM`] by default.
///
/// Distances are great-circle distances, so plans computed on this route
/// underestimate real road mileage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineRouteProvider {
    spacing_km: f64,
}

impl Default for StraightLineRouteProvider {
    fn default() -> Self {
        Self {
            spacing_km: DEFAULT_SPACING_KM,
        }
    }
}

impl StraightLineRouteProvider {
    /// Provider placing a point every `spacing_km`; non-positive spacing
    /// falls back to the default.
    #[must_use]
    pub fn with_spacing_km(spacing_km: f64) -> Self {
        if spacing_km.is_finite() && spacing_km > 0.0 {
            Self { spacing_km }
        } else {
            Self::default()
        }
    }

    fn point_count(&self, start: Coord<f64>, end: Coord<f64>) -> usize {
        let km = haversine_miles(start, end) * KM_PER_MILE;
        let intervals = (km / self.spacing_km).floor();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "interval count is a small non-negative whole number"
        )]
        let whole = intervals.min(100_000.0) as usize;
        whole.saturating_add(1).max(2)
    }
}

impl RouteProvider for StraightLineRouteProvider {
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        let count = self.point_count(start, end);
        let last = count - 1;
        #[expect(clippy::cast_precision_loss, reason = "point counts are small")]
        let points = (0..count)
            .map(|index| {
                let ratio = index as f64 / last as f64;
                Coord {
                    x: start.x + (end.x - start.x) * ratio,
                    y: start.y + (end.y - start.y) * ratio,
                }
            })
            .collect();
        RoutePolyline::from_coords(points).map_err(RouteError::Geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refuel_core::PlanError;
    use rstest::rstest;

    #[rstest]
    fn interpolates_a_point_every_ten_kilometres() {
        let start = Coord { x: -100.0, y: 40.0 };
        let end = Coord { x: -100.0, y: 41.0 };
        let route = StraightLineRouteProvider::default()
            .route(start, end)
            .expect("route");
        assert_eq!(route.points().len(), 12);
        assert_eq!(route.start(), start);
        assert_eq!(route.end(), end);
        let expected = haversine_miles(start, end);
        assert!((route.total_miles() - expected).abs() < 1e-6);
    }

    #[rstest]
    fn short_hops_keep_both_endpoints() {
        let route = StraightLineRouteProvider::with_spacing_km(-1.0)
            .route(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.0 })
            .expect("route");
        assert_eq!(route.points().len(), 2);
    }

    #[rstest]
    fn identical_endpoints_are_rejected() {
        let here = Coord { x: 5.0, y: 5.0 };
        let err = StraightLineRouteProvider::default()
            .route(here, here)
            .expect_err("zero length");
        assert!(matches!(err, RouteError::Geometry(PlanError::InvalidGeometry { .. })));
    }
}
