//! `Geocoder` over the Nominatim `/search` endpoint.

use std::time::Duration;

use geo::Coord;
use refuel_core::geocoding::{GeocodeError, Geocoder, Place};
use serde::Deserialize;

use crate::blocking::{
    BlockingHttp, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, normalise_base_url,
};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Countries searched unless configured otherwise.
pub const DEFAULT_COUNTRY_CODES: &str = "us";

/// Candidates requested per query.
pub const DEFAULT_RESULT_LIMIT: u8 = 5;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimGeocoderConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Comma-separated ISO 3166-1 alpha-2 codes limiting the search; empty
    /// searches everywhere.
    pub country_codes: String,
    /// Maximum number of candidates.
    pub limit: u8,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent header. Nominatim's usage policy requires one that
    /// identifies the application.
    pub user_agent: String,
}

impl Default for NominatimGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            country_codes: DEFAULT_COUNTRY_CODES.to_owned(),
            limit: DEFAULT_RESULT_LIMIT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimGeocoderConfig {
    /// Configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Restrict results to the given country codes.
    #[must_use]
    pub fn with_country_codes(mut self, country_codes: impl Into<String>) -> Self {
        self.country_codes = country_codes.into();
        self
    }

    /// Set the candidate limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
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

/// One `format=json` search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

impl SearchHit {
    fn into_place(self) -> Option<Place> {
        let lat: f64 = self.lat.trim().parse().ok()?;
        let lon: f64 = self.lon.trim().parse().ok()?;
        (lat.is_finite() && lon.is_finite()).then(|| Place {
            display_name: self.display_name,
            location: Coord { x: lon, y: lat },
        })
    }
}

/// Free-text geocoder backed by Nominatim.
#[derive(Debug)]
pub struct NominatimGeocoder {
    http: BlockingHttp,
    search_url: String,
    config: NominatimGeocoderConfig,
}

impl NominatimGeocoder {
    /// Geocoder for the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// See [`NominatimGeocoder::with_config`].
    pub fn new() -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimGeocoderConfig::default())
    }

    /// Geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or when the HTTP
    /// client or Tokio runtime cannot be built.
    pub fn with_config(config: NominatimGeocoderConfig) -> Result<Self, ProviderBuildError> {
        let search_url = format!("{}/search", normalise_base_url(&config.base_url)?);
        let http = BlockingHttp::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            search_url,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimGeocoderConfig {
        &self.config
    }

    fn query_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_owned()),
            ("format", "json".to_owned()),
            ("limit", self.config.limit.to_string()),
        ];
        if !self.config.country_codes.is_empty() {
            params.push(("countrycodes", self.config.country_codes.clone()));
        }
        params
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GeocodeError> {
        let unavailable = |err: reqwest::Error| GeocodeError::Unavailable {
            message: err.to_string(),
        };
        self.http
            .client()
            .get(&self.search_url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        let hits = self.http.block_on(self.search(trimmed))?;
        let total = hits.len();
        let places: Vec<Place> = hits.into_iter().filter_map(SearchHit::into_place).collect();
        if places.len() < total {
            log::warn!(
                "dropped {} Nominatim results with unreadable coordinates for `{trimmed}`",
                total - places.len()
            );
        }
        Ok(places)
    }
}
