//! OSRM Route API response types.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code: `"Ok"`, `"NoRoute"`, `"InvalidQuery"` and so on.
    pub code: String,
    /// Error message when `code` is not `"Ok"`.
    pub message: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }
}

/// One route requested with `geometries=geojson`.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Road distance in metres.
    pub distance: f64,
    /// GeoJSON `LineString`.
    pub geometry: LineString,
}

#[derive(Debug, Deserialize)]
pub struct LineString {
    /// `[longitude, latitude]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}
