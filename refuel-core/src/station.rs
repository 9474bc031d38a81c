//! Fuel stations and their position relative to a route.

use geo::Coord;
use thiserror::Error;

use crate::route::KM_PER_MILE;

/// A retail fuel station with a posted price.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use refuel_core::FuelStation;
///
/// # fn main() -> Result<(), refuel_core::StationError> {
/// let station = FuelStation::new(7, "Pilot", "I-80 Exit 12", Coord { x: -100.0, y: 40.0 }, 3.49)?;
/// assert_eq!(station.price_per_gallon, 3.49);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelStation {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Display address.
    pub address: String,
    /// Geospatial position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Retail price in dollars per gallon.
    pub price_per_gallon: f64,
}

/// Validation errors for [`FuelStation::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationError {
    /// Prices must be positive and finite.
    #[error("station {id} has a non-positive price {price}")]
    InvalidPrice {
        /// Station identifier.
        id: u64,
        /// Rejected price.
        price: f64,
    },
    /// Coordinates must be finite WGS84 positions.
    #[error("station {id} has an invalid location")]
    InvalidLocation {
        /// Station identifier.
        id: u64,
    },
}

impl FuelStation {
    /// Validate and construct a station.
    ///
    /// # Errors
    ///
    /// Returns [`StationError::InvalidPrice`] for non-positive or non-finite
    /// prices and [`StationError::InvalidLocation`] for coordinates outside
    /// the WGS84 range.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        address: impl Into<String>,
        location: Coord<f64>,
        price_per_gallon: f64,
    ) -> Result<Self, StationError> {
        let station = Self {
            id,
            name: name.into(),
            address: address.into(),
            location,
            price_per_gallon,
        };
        station.validate()?;
        Ok(station)
    }

    /// Check the price and location invariants.
    ///
    /// # Errors
    ///
    /// See [`FuelStation::new`].
    pub fn validate(&self) -> Result<(), StationError> {
        if !(self.price_per_gallon.is_finite() && self.price_per_gallon > 0.0) {
            return Err(StationError::InvalidPrice {
                id: self.id,
                price: self.price_per_gallon,
            });
        }
        let Coord { x, y } = self.location;
        if !((-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y)) {
            return Err(StationError::InvalidLocation { id: self.id });
        }
        Ok(())
    }
}

/// A station that lies within the corridor of a route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedStation {
    /// The underlying station.
    pub station: FuelStation,
    /// Road distance from the route start to the projected point, in miles.
    pub distance_along_route_miles: f64,
    /// Lateral offset from the route, in kilometres.
    pub distance_from_route_km: f64,
}

impl ProjectedStation {
    /// Station identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.station.id
    }

    /// Price in dollars per gallon.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.station.price_per_gallon
    }

    /// Road distance from the route start in kilometres.
    #[must_use]
    pub fn distance_along_route_km(&self) -> f64 {
        self.distance_along_route_miles * KM_PER_MILE
    }

    /// Lateral offset from the route in miles.
    #[must_use]
    pub fn distance_from_route_miles(&self) -> f64 {
        self.distance_from_route_km / KM_PER_MILE
    }
}
