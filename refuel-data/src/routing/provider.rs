//! `RouteProvider` over OSRM's Route API.

use std::time::Duration;

use geo::Coord;
use refuel_core::RoutePolyline;
use refuel_core::route::METRES_PER_MILE;
use refuel_core::routing::{RouteError, RouteProvider};

use super::osrm::RouteResponse;
use crate::blocking::{
    BlockingHttp, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, normalise_base_url,
};

/// OSRM profile requested unless configured otherwise.
pub const DEFAULT_OSRM_PROFILE: &str = "driving";

/// Configuration for [`OsrmRouteProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmRouteProviderConfig {
    /// Base URL of the OSRM service (e.g. `"http://localhost:5000"`).
    pub base_url: String,
    /// Routing profile segment of the request path.
    pub profile: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent header.
    pub user_agent: String,
}

impl Default for OsrmRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_OSRM_PROFILE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmRouteProviderConfig {
    /// Configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Road routes from an OSRM server.
///
/// The synchronous [`RouteProvider`] call blocks on the request; see
/// the crate documentation for the runtime rules. The returned polyline is
/// scaled so its length equals the road distance OSRM reports.
#[derive(Debug)]
pub struct OsrmRouteProvider {
    http: BlockingHttp,
    base_url: String,
    config: OsrmRouteProviderConfig,
}

impl OsrmRouteProvider {
    /// Provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// See [`OsrmRouteProvider::with_config`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmRouteProviderConfig::new(base_url))
    }

    /// Provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or when the HTTP
    /// client or Tokio runtime cannot be built.
    pub fn with_config(config: OsrmRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let base_url = normalise_base_url(&config.base_url)?;
        let http = BlockingHttp::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmRouteProviderConfig {
        &self.config
    }

    /// `{base}/route/v1/{profile}/{lon},{lat};{lon},{lat}`.
    fn build_route_url(&self, start: Coord<f64>, end: Coord<f64>) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url, self.config.profile, start.x, start.y, end.x, end.y
        )
    }

    async fn fetch_route(&self, url: &str) -> Result<RoutePolyline, RouteError> {
        let response = self
            .http
            .client()
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        // OSRM answers NoRoute with a 400 and a JSON body; keep the body.
        let status = response.status();
        let body: Result<RouteResponse, _> = response.json().await;
        match body {
            Ok(parsed) => convert_response(parsed),
            Err(_) if !status.is_success() => Err(RouteError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_owned(),
            }),
            Err(err) => Err(RouteError::Parse {
                message: err.to_string(),
            }),
        }
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteError {
        if error.is_timeout() {
            return RouteError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return RouteError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        RouteError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn convert_response(response: RouteResponse) -> Result<RoutePolyline, RouteError> {
    if response.is_no_route() {
        return Err(RouteError::NoRoute);
    }
    if !response.is_ok() {
        return Err(RouteError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let route = response.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
    let points = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[x, y]| Coord { x, y })
        .collect();
    RoutePolyline::from_coords(points)
        .and_then(|polyline| polyline.scaled_to_total(route.distance / METRES_PER_MILE))
        .map_err(RouteError::Geometry)
}

impl RouteProvider for OsrmRouteProvider {
    fn route(&self, start: Coord<f64>, end: Coord<f64>) -> Result<RoutePolyline, RouteError> {
        let url = self.build_route_url(start, end);
        log::debug!("requesting OSRM route {url}");
        let route = self.http.block_on(self.fetch_route(&url))?;
        log::debug!(
            "OSRM route has {} points over {:.1} mi",
            route.points().len(),
            route.total_miles()
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::osrm::{LineString, OsrmRoute};
    use refuel_core::PlanError;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> OsrmRouteProvider {
        OsrmRouteProvider::new("http://osrm.example.com/").expect("provider should build")
    }

    fn ok_response(distance: f64, coordinates: Vec<[f64; 2]>) -> RouteResponse {
        RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: vec![OsrmRoute {
                distance,
                geometry: LineString { coordinates },
            }],
        }
    }

    #[rstest]
    fn build_route_url_formats_lon_lat_pairs(provider: OsrmRouteProvider) {
        let url = provider.build_route_url(Coord { x: -104.99, y: 39.74 }, Coord { x: -101.83, y: 35.22 });
        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/-104.99,39.74;-101.83,35.22"
        );
    }

    #[rstest]
    fn convert_response_scales_to_road_distance() {
        let response = ok_response(
            160_934.4,
            vec![[-100.0, 40.0], [-100.0, 40.5], [-100.0, 41.0]],
        );
        let route = convert_response(response).expect("route");
        assert!((route.total_miles() - 100.0).abs() < 1e-9);
        assert_eq!(route.points().len(), 3);
    }

    #[rstest]
    #[case::explicit("NoRoute")]
    #[case::empty("Ok")]
    fn convert_response_reports_missing_routes(#[case] code: &str) {
        let response = RouteResponse {
            code: code.to_owned(),
            message: None,
            routes: Vec::new(),
        };
        assert_eq!(convert_response(response), Err(RouteError::NoRoute));
    }

    #[rstest]
    fn convert_response_reports_service_errors() {
        let response = RouteResponse {
            code: "InvalidQuery".to_owned(),
            message: Some("Query string malformed".to_owned()),
            routes: Vec::new(),
        };
        assert_eq!(
            convert_response(response),
            Err(RouteError::Service {
                code: "InvalidQuery".to_owned(),
                message: "Query string malformed".to_owned(),
            })
        );
    }

    #[rstest]
    fn convert_response_rejects_degenerate_geometry() {
        let response = ok_response(1000.0, vec![[-100.0, 40.0]]);
        assert!(matches!(
            convert_response(response),
            Err(RouteError::Geometry(PlanError::InvalidGeometry { .. }))
        ));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OsrmRouteProviderConfig::new("http://example.com")
            .with_profile("truck")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.profile, "truck");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[rstest]
    fn invalid_base_url_fails_to_build() {
        let err = OsrmRouteProvider::new("not a url").expect_err("invalid url");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }
}
