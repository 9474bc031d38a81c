//! Error types emitted by the refuel CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use refuel_core::PlanError;
use refuel_core::geocoding::GeocodeError;
use refuel_core::routing::RouteError;
use refuel_core::store::SqliteStationStoreError;
use refuel_data::ProviderBuildError;
use refuel_data::stations::StationImportError;
use thiserror::Error;

/// Errors emitted by the refuel CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}")]
    InspectSourcePath {
        /// Option naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the plan request file failed.
    #[error("failed to read plan request at {path:?}")]
    OpenPlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Plan request JSON could not be decoded.
    #[error("failed to parse plan request JSON at {path:?}")]
    ParsePlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// An HTTP collaborator could not be constructed.
    #[error("failed to build {service} client for {base_url:?}")]
    BuildProvider {
        /// Collaborator kind.
        service: &'static str,
        /// Configured base URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// A request location could not be resolved.
    #[error("could not resolve {role} location {query:?}")]
    ResolveLocation {
        /// `start` or `end`.
        role: &'static str,
        /// Text from the request.
        query: String,
        /// Geocoder failure.
        #[source]
        source: GeocodeError,
    },
    /// No route could be fetched.
    #[error("failed to fetch route")]
    Route(#[from] RouteError),
    /// The station store could not be opened.
    #[error("failed to open station store at {path:?}")]
    OpenStationStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: Box<SqliteStationStoreError>,
    },
    /// Importing stations failed.
    #[error("station import failed")]
    ImportStations(#[from] StationImportError),
    /// Planning rejected the inputs or found no feasible plan.
    #[error("planning failed")]
    Plan(#[from] PlanError),
    /// Serializing the command output failed.
    #[error("failed to serialize output")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output")]
    WriteOutput(#[source] std::io::Error),
}
