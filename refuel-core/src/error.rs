//! Error kinds surfaced by route planning.
//!
//! Every variant is a deterministic function of the input, except
//! [`PlanError::UpstreamUnavailable`], which is only ever propagated from a
//! collaborator and never raised by the planning core itself.

use thiserror::Error;

/// Errors returned while projecting stations, building the decision graph or
/// solving for a refuelling plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The route polyline is degenerate or malformed.
    #[error("invalid route geometry: {reason}")]
    InvalidGeometry {
        /// Human-readable description of the defect.
        reason: &'static str,
    },
    /// A numeric parameter fell outside its accepted range.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameters {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Constraint that was violated.
        reason: &'static str,
    },
    /// No combination of refuelling decisions reaches the destination.
    #[error("no feasible refuelling plan reaches the destination{}", describe_stall(.stalled_at_miles))]
    NoFeasiblePath {
        /// Furthest position reached before running dry, when known.
        stalled_at_miles: Option<f64>,
    },
    /// A collaborator such as the route provider or station source failed.
    #[error("{service} is unavailable: {message}")]
    UpstreamUnavailable {
        /// Name of the failing collaborator.
        service: &'static str,
        /// Description forwarded from the collaborator.
        message: String,
    },
}

impl PlanError {
    /// Shorthand for an [`PlanError::InvalidParameters`] value.
    #[must_use]
    pub const fn invalid(parameter: &'static str, reason: &'static str) -> Self {
        Self::InvalidParameters { parameter, reason }
    }

    /// Shorthand for a [`PlanError::NoFeasiblePath`] without a stall position.
    #[must_use]
    pub const fn no_feasible_path() -> Self {
        Self::NoFeasiblePath {
            stalled_at_miles: None,
        }
    }
}

fn describe_stall(stalled_at_miles: &Option<f64>) -> String {
    match stalled_at_miles {
        Some(miles) => format!(" (stalled at mile {miles:.1})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlanError::invalid("interval_miles", "must be positive"), "invalid parameter `interval_miles`: must be positive")]
    #[case(PlanError::no_feasible_path(), "no feasible refuelling plan reaches the destination")]
    #[case(
        PlanError::NoFeasiblePath { stalled_at_miles: Some(200.0) },
        "no feasible refuelling plan reaches the destination (stalled at mile 200.0)"
    )]
    #[case(
        PlanError::UpstreamUnavailable { service: "route provider", message: "timed out".to_owned() },
        "route provider is unavailable: timed out"
    )]
    fn messages_are_descriptive(#[case] error: PlanError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
