use thiserror::Error;

use crate::PlanError;

/// Errors from [`crate::routing::RouteProvider::route`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The provider answered but found no road connection.
    #[error("no route found between the requested points")]
    NoRoute,
    /// The provider returned geometry the core cannot use.
    #[error("route geometry rejected: {0}")]
    Geometry(#[source] PlanError),
    /// The request could not reach the provider.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The provider did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response description.
        message: String,
    },
    /// The provider reported an error code in its payload.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Service status code.
        code: String,
        /// Service message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

impl RouteError {
    /// Whether the failure says nothing about route existence, only that
    /// the provider could not answer.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        !matches!(self, Self::NoRoute | Self::Geometry(_))
    }
}

impl From<RouteError> for PlanError {
    fn from(error: RouteError) -> Self {
        match error {
            RouteError::NoRoute => Self::no_feasible_path(),
            RouteError::Geometry(source) => source,
            other => Self::UpstreamUnavailable {
                service: "route provider",
                message: other.to_string(),
            },
        }
    }
}
