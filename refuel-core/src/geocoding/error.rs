use thiserror::Error;

use crate::PlanError;

/// Errors from [`crate::geocoding::Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query was empty after trimming.
    #[error("location query is empty")]
    EmptyQuery,
    /// The geocoder returned no candidates.
    #[error("no location matches `{query}`")]
    NotFound {
        /// Query that produced no match.
        query: String,
    },
    /// The geocoding service could not be reached or answered badly.
    #[error("geocoding service unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

impl From<GeocodeError> for PlanError {
    fn from(error: GeocodeError) -> Self {
        match error {
            GeocodeError::EmptyQuery | GeocodeError::NotFound { .. } => {
                Self::invalid("location", "could not be resolved to a coordinate")
            }
            GeocodeError::Unavailable { message } => Self::UpstreamUnavailable {
                service: "geocoder",
                message,
            },
        }
    }
}
