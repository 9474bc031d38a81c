//! Route providers backed by OSRM or plain geometry.
//!
//! [`OsrmRouteProvider`] implements [`refuel_core::routing::RouteProvider`]
//! against the OSRM Route API. [`StraightLineRouteProvider`] needs no
//! network and is meant as the secondary of a
//! [`FallbackRouteProvider`](refuel_core::routing::FallbackRouteProvider).
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use refuel_core::routing::{FallbackRouteProvider, RouteProvider};
//! use refuel_data::routing::{OsrmRouteProvider, StraightLineRouteProvider};
//!
//! let provider = FallbackRouteProvider::new(
//!     OsrmRouteProvider::new("http://localhost:5000")?,
//!     StraightLineRouteProvider::default(),
//! );
//! let route = provider.route(
//!     Coord { x: -104.99, y: 39.74 },
//!     Coord { x: -101.83, y: 35.22 },
//! )?;
//! println!("{:.0} miles", route.total_miles());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;
mod straight_line;

pub use provider::{DEFAULT_OSRM_PROFILE, OsrmRouteProvider, OsrmRouteProviderConfig};
pub use straight_line::{DEFAULT_SPACING_KM, StraightLineRouteProvider};
