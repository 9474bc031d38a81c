//! Free-text location lookup.
//!
//! A [`Geocoder`] turns a query such as `"Denver, CO"` into candidate
//! places. [`resolve_location`] is the entry point used when planning: it
//! accepts literal `"lat,lon"` pairs without consulting the geocoder.

mod error;
mod provider;

pub use error::GeocodeError;
pub use provider::{Geocoder, Place, parse_coordinate_pair, resolve_location};
