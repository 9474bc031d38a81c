//! JSON request files read by the `plan` and `nearby` subcommands.

use std::io::BufReader;

use camino::Utf8Path;
use refuel_core::Algorithm;
use refuel_core::projection::DEFAULT_MAX_CORRIDOR_KM;
use refuel_fs::open_utf8_file;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// A trip to plan.
///
/// `start` and `end` accept free text (`"Denver, CO"`) or `"lat,lon"`
/// literals; literals never reach the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlanRequestFile {
    pub(crate) start: String,
    pub(crate) end: String,
    #[serde(default)]
    pub(crate) algorithm: Algorithm,
    /// Fuel on departure; a full tank when omitted.
    #[serde(default)]
    pub(crate) initial_fuel_gallons: Option<f64>,
    #[serde(default = "default_max_distance_km")]
    pub(crate) max_distance_km: f64,
}

const fn default_max_distance_km() -> f64 {
    DEFAULT_MAX_CORRIDOR_KM
}

/// Load a JSON-encoded [`PlanRequestFile`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequestFile, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPlanRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}
