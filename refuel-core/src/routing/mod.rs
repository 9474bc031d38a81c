//! Route geometry collaborators.
//!
//! The [`RouteProvider`] trait abstracts the retrieval of a road route
//! between two coordinates. Implementations live outside the core (HTTP
//! services, offline fallbacks); the core only consumes the resulting
//! [`RoutePolyline`](crate::RoutePolyline).
//!
//! Errors distinguish "no route exists" from "the provider could not be
//! reached" so callers can decide whether a fallback makes sense.

mod error;
mod provider;

pub use error::RouteError;
pub use provider::{FallbackRouteProvider, RouteProvider};
