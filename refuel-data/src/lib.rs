//! Data access for the refuelling engine.
//!
//! Responsibilities:
//! - Fetch road geometry from an OSRM service, with a straight-line
//!   fallback for offline use.
//! - Resolve free-text places through a Nominatim geocoder.
//! - Import station price lists from CSV into the SQLite station store.
//!
//! Boundaries:
//! - Domain rules (projection, solving, plan assembly) live in
//!   `refuel-core`; this crate only produces its inputs.
//! - The collaborator traits are synchronous. HTTP clients block on an
//!   owned Tokio runtime, or on the caller's runtime when it is
//!   multi-threaded.

#![forbid(unsafe_code)]

mod blocking;
pub mod geocoding;
pub mod routing;
pub mod stations;

pub use blocking::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError};
