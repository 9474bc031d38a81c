//! Route provider trait and a fallback combinator.

use geo::Coord;

use crate::RoutePolyline;

use super::error::RouteError;

/// Fetch road geometry between two coordinates.
///
/// Coordinates use WGS84 with `x = longitude` and `y = latitude`. The
/// returned polyline carries cumulative road distance in miles; its last
/// value is the total route distance.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use refuel_core::RoutePolyline;
/// use refuel_core::routing::{RouteError, RouteProvider};
///
/// struct Direct;
///
/// impl RouteProvider for Direct {
///     fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
///         RoutePolyline::from_coords(vec![start, end]).map_err(RouteError::Geometry)
///     }
/// }
///
/// let route = Direct.route(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 })?;
/// assert!(route.total_miles() > 69.0);
/// # Ok::<(), RouteError>(())
/// ```
pub trait RouteProvider {
    /// Return the route from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Implementations must return [`RouteError::NoRoute`] when the service
    /// answered without a route, and one of the unavailability variants when
    /// it could not answer at all.
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError>;
}

impl<T: RouteProvider + ?Sized> RouteProvider for &T {
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        (**self).route(start, end)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        (**self).route(start, end)
    }
}

/// Try `primary` first and use `fallback` only when `primary` is unavailable.
///
/// A definitive [`RouteError::NoRoute`] from the primary is returned as is.
#[derive(Debug, Clone)]
pub struct FallbackRouteProvider<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackRouteProvider<P, F> {
    /// Combine two providers.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RouteProvider, F: RouteProvider> RouteProvider for FallbackRouteProvider<P, F> {
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        match self.primary.route(start, end) {
            Err(error) if error.is_unavailable() => {
                log::warn!("primary route provider unavailable ({error}); using fallback");
                self.fallback.route(start, end)
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubRouteProvider;
    use rstest::rstest;

    fn endpoints() -> (Coord<f64>, Coord<f64>) {
        (Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 })
    }

    #[rstest]
    fn falls_back_when_primary_is_unavailable() {
        let fallback_route = crate::test_support::straight_route(42.0);
        let provider = FallbackRouteProvider::new(
            StubRouteProvider::with_error(RouteError::Network {
                url: "http://osrm".to_owned(),
                message: "connection refused".to_owned(),
            }),
            StubRouteProvider::with_route(fallback_route.clone()),
        );
        let (start, end) = endpoints();
        assert_eq!(provider.route(start, end), Ok(fallback_route));
    }

    #[rstest]
    fn keeps_definitive_no_route_answers() {
        let provider = FallbackRouteProvider::new(
            StubRouteProvider::with_error(RouteError::NoRoute),
            StubRouteProvider::with_route(crate::test_support::straight_route(42.0)),
        );
        let (start, end) = endpoints();
        assert_eq!(provider.route(start, end), Err(RouteError::NoRoute));
    }
}
