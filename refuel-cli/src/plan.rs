//! `plan` and `nearby` subcommands.
//!
//! Both read a [`PlanRequestFile`], resolve its endpoints, fetch the route
//! and load the stations inside the corridor. `plan` then runs the chosen
//! solver; `nearby` stops after projection.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use refuel_core::geocoding::{GeocodeError, Geocoder, Place, resolve_location};
use refuel_core::route::DEFAULT_MAX_ROUTE_POINTS;
use refuel_core::routing::{FallbackRouteProvider, RouteProvider};
use refuel_core::store::{SqliteStationStore, candidate_stations};
use refuel_core::{
    Algorithm, DEFAULT_MILES_PER_GALLON, DEFAULT_TANK_CAPACITY_GALLONS, FuelSolver, FuelStation,
    NearbyStations, Plan, RoutePolyline, VehicleProfile, nearby_stations, plan_route_with,
};
use refuel_data::geocoding::{DEFAULT_NOMINATIM_URL, NominatimGeocoder, NominatimGeocoderConfig};
use refuel_data::routing::{OsrmRouteProvider, OsrmRouteProviderConfig, StraightLineRouteProvider};
use serde::{Deserialize, Serialize};

use crate::request::{PlanRequestFile, load_plan_request};
use crate::{
    ARG_INTERVAL_MILES, ARG_MPG, ARG_NOMINATIM_BASE_URL, ARG_OFFLINE, ARG_OSRM_BASE_URL,
    ARG_OUTPUT, ARG_REQUEST, ARG_STATIONS_DB, ARG_TANK_GALLONS, CliError,
    ENV_NEARBY_REQUEST, ENV_NEARBY_STATIONS_DB, ENV_PLAN_REQUEST, ENV_PLAN_STATIONS_DB,
    require_existing, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan the cheapest fuel stops for the trip described by a \
                 JSON request. Start and end are geocoded (or given as \
                 \"lat,lon\"), the route comes from OSRM with a straight-line \
                 fallback, and candidate stations are read from the SQLite \
                 store written by `import-stations`.",
    about = "Compute a refuelling plan"
)]
#[ortho_config(prefix = "REFUEL")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file describing the trip.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the SQLite station store.
    #[arg(long = ARG_STATIONS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) stations_db: Option<Utf8PathBuf>,
    /// Base URL of the OSRM service.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Skip network services: straight-line routes and coordinate literals only.
    #[arg(long = ARG_OFFLINE, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) offline: bool,
    /// Tank capacity in gallons.
    #[arg(long = ARG_TANK_GALLONS, value_name = "gallons")]
    #[serde(default)]
    pub(crate) tank_gallons: Option<f64>,
    /// Fuel economy in miles per gallon.
    #[arg(long = ARG_MPG, value_name = "mpg")]
    #[serde(default)]
    pub(crate) mpg: Option<f64>,
    /// Waypoint spacing used by the exact solver, in miles.
    #[arg(long = ARG_INTERVAL_MILES, value_name = "miles")]
    #[serde(default)]
    pub(crate) interval_miles: Option<f64>,
    /// Write the JSON report here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PlanArgs {
    fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List the stations within the request's corridor, in route \
                 order, without choosing stops.",
    about = "List stations near a route"
)]
#[ortho_config(prefix = "REFUEL")]
pub(crate) struct NearbyArgs {
    /// Path to a JSON file describing the trip.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the SQLite station store.
    #[arg(long = ARG_STATIONS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) stations_db: Option<Utf8PathBuf>,
    /// Base URL of the OSRM service.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Skip network services: straight-line routes and coordinate literals only.
    #[arg(long = ARG_OFFLINE, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) offline: bool,
    /// Write the JSON report here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl NearbyArgs {
    fn into_config(self) -> Result<LookupConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LookupConfig::try_from(merged)
    }
}

/// Environment variables naming the required options of one subcommand.
#[derive(Debug, Clone, Copy)]
struct RequiredEnv {
    request: &'static str,
    stations_db: &'static str,
}

const PLAN_ENV: RequiredEnv = RequiredEnv {
    request: ENV_PLAN_REQUEST,
    stations_db: ENV_PLAN_STATIONS_DB,
};

const NEARBY_ENV: RequiredEnv = RequiredEnv {
    request: ENV_NEARBY_REQUEST,
    stations_db: ENV_NEARBY_STATIONS_DB,
};

/// Inputs shared by `plan` and `nearby`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LookupConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) stations_db: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) nominatim_base_url: String,
    pub(crate) offline: bool,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl LookupConfig {
    fn resolve(args: NearbyArgs, env: RequiredEnv) -> Result<Self, CliError> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: env.request,
        })?;
        let stations_db = args.stations_db.ok_or(CliError::MissingArgument {
            field: ARG_STATIONS_DB,
            env: env.stations_db,
        })?;
        let osrm_base_url = args
            .osrm_base_url
            .unwrap_or_else(|| OsrmRouteProviderConfig::default().base_url);
        let nominatim_base_url = args
            .nominatim_base_url
            .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned());
        Ok(Self {
            request_path,
            stations_db,
            osrm_base_url,
            nominatim_base_url,
            offline: args.offline,
            output: args.output,
        })
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        require_existing(&self.stations_db, ARG_STATIONS_DB)?;
        Ok(())
    }
}

impl TryFrom<NearbyArgs> for LookupConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        Self::resolve(args, NEARBY_ENV)
    }
}

/// Exact solver tuning; `None` keeps the solver default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SolverSettings {
    pub(crate) interval_miles: Option<f64>,
}

/// Resolved `plan` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) lookup: LookupConfig,
    pub(crate) tank_gallons: f64,
    pub(crate) mpg: f64,
    pub(crate) solver: SolverSettings,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let PlanArgs {
            request_path,
            stations_db,
            osrm_base_url,
            nominatim_base_url,
            offline,
            tank_gallons,
            mpg,
            interval_miles,
            output,
        } = args;
        let lookup = LookupConfig::resolve(
            NearbyArgs {
                request_path,
                stations_db,
                osrm_base_url,
                nominatim_base_url,
                offline,
                output,
            },
            PLAN_ENV,
        )?;
        Ok(Self {
            lookup,
            tank_gallons: tank_gallons.unwrap_or(DEFAULT_TANK_CAPACITY_GALLONS),
            mpg: mpg.unwrap_or(DEFAULT_MILES_PER_GALLON),
            solver: SolverSettings { interval_miles },
        })
    }
}

/// Builds the route provider and geocoder for one invocation.
pub(crate) trait CollaboratorFactory {
    fn route_provider(&self, config: &LookupConfig) -> Result<Box<dyn RouteProvider>, CliError>;
    fn geocoder(&self, config: &LookupConfig) -> Result<Box<dyn Geocoder>, CliError>;
}

/// OSRM with a straight-line fallback and Nominatim, or offline stand-ins.
pub(crate) struct DefaultCollaborators;

impl CollaboratorFactory for DefaultCollaborators {
    fn route_provider(&self, config: &LookupConfig) -> Result<Box<dyn RouteProvider>, CliError> {
        if config.offline {
            return Ok(Box::new(StraightLineRouteProvider::default()));
        }
        let osrm = OsrmRouteProvider::new(config.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                service: "OSRM route provider",
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(FallbackRouteProvider::new(
            osrm,
            StraightLineRouteProvider::default(),
        )))
    }

    fn geocoder(&self, config: &LookupConfig) -> Result<Box<dyn Geocoder>, CliError> {
        if config.offline {
            return Ok(Box::new(OfflineGeocoder));
        }
        let geocoder =
            NominatimGeocoder::with_config(NominatimGeocoderConfig::new(
                config.nominatim_base_url.clone(),
            ))
            .map_err(|source| CliError::BuildProvider {
                service: "Nominatim geocoder",
                base_url: config.nominatim_base_url.clone(),
                source,
            })?;
        Ok(Box::new(geocoder))
    }
}

/// Geocoder used with `--offline`; only coordinate literals resolve.
struct OfflineGeocoder;

impl Geocoder for OfflineGeocoder {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        Err(GeocodeError::Unavailable {
            message: format!("cannot look up {query:?} offline; use a \"lat,lon\" literal"),
        })
    }
}

/// JSON written by `plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanReport {
    pub(crate) start: Place,
    pub(crate) end: Place,
    pub(crate) plan: Plan,
}

/// JSON written by `nearby`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NearbyReport {
    pub(crate) start: Place,
    pub(crate) end: Place,
    pub(crate) nearby: NearbyStations,
}

/// Everything resolved before solving.
struct Trip {
    request: PlanRequestFile,
    start: Place,
    end: Place,
    route: RoutePolyline,
    candidates: Vec<FuelStation>,
}

pub(crate) fn run_plan(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    run_plan_with(args, &DefaultCollaborators, writer)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    factory: &dyn CollaboratorFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_plan(&config, factory, writer)
}

pub(crate) fn execute_plan(
    config: &PlanConfig,
    factory: &dyn CollaboratorFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let trip = prepare_trip(&config.lookup, factory)?;
    let vehicle = VehicleProfile::new(
        config.tank_gallons,
        config.mpg,
        trip.request.initial_fuel_gallons,
    )?;
    let solver = solver_for(trip.request.algorithm, config.solver)?;
    let plan = plan_route_with(
        &trip.route,
        &trip.candidates,
        &vehicle,
        trip.request.max_distance_km,
        solver.as_ref(),
    )?;
    let report = PlanReport {
        start: trip.start,
        end: trip.end,
        plan,
    };
    emit(writer, config.lookup.output.as_deref(), &report)
}

pub(crate) fn run_nearby(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    run_nearby_with(args, &DefaultCollaborators, writer)
}

pub(crate) fn run_nearby_with(
    args: NearbyArgs,
    factory: &dyn CollaboratorFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_nearby(&config, factory, writer)
}

pub(crate) fn execute_nearby(
    config: &LookupConfig,
    factory: &dyn CollaboratorFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let trip = prepare_trip(config, factory)?;
    let nearby = nearby_stations(&trip.route, &trip.candidates, trip.request.max_distance_km)?;
    let report = NearbyReport {
        start: trip.start,
        end: trip.end,
        nearby,
    };
    emit(writer, config.output.as_deref(), &report)
}

fn prepare_trip(
    config: &LookupConfig,
    factory: &dyn CollaboratorFactory,
) -> Result<Trip, CliError> {
    config.validate_sources()?;
    let request = load_plan_request(&config.request_path)?;
    let geocoder = factory.geocoder(config)?;
    let start = resolve(geocoder.as_ref(), "start", &request.start)?;
    let end = resolve(geocoder.as_ref(), "end", &request.end)?;

    let provider = factory.route_provider(config)?;
    let route = provider
        .route(start.location, end.location)?
        .simplify(DEFAULT_MAX_ROUTE_POINTS);

    let store = SqliteStationStore::open(config.stations_db.as_std_path()).map_err(|source| {
        CliError::OpenStationStore {
            path: config.stations_db.clone(),
            source: Box::new(source),
        }
    })?;
    let candidates = candidate_stations(&store, &route, request.max_distance_km);
    log::info!(
        "route {} to {} is {:.1} mi with {} candidate stations",
        start.display_name,
        end.display_name,
        route.total_miles(),
        candidates.len()
    );
    Ok(Trip {
        request,
        start,
        end,
        route,
        candidates,
    })
}

fn resolve(geocoder: &dyn Geocoder, role: &'static str, query: &str) -> Result<Place, CliError> {
    resolve_location(geocoder, query).map_err(|source| CliError::ResolveLocation {
        role,
        query: query.to_owned(),
        source,
    })
}

fn emit<T: Serialize>(
    writer: &mut dyn Write,
    output: Option<&Utf8Path>,
    report: &T,
) -> Result<(), CliError> {
    let Some(path) = output else {
        return write_json(writer, report);
    };
    let mut payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeOutput)?;
    payload.push('\n');
    refuel_fs::write_utf8_file(path, &payload).map_err(CliError::WriteOutput)?;
    log::info!("wrote report to {path}");
    Ok(())
}

/// The solver for `algorithm`, if it was compiled in.
pub(crate) fn solver_for(
    algorithm: Algorithm,
    settings: SolverSettings,
) -> Result<Box<dyn FuelSolver>, CliError> {
    match algorithm {
        Algorithm::Exact => exact_solver(settings),
        Algorithm::Greedy => greedy_solver(),
    }
}

#[cfg(feature = "solver-exact")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "signature matches the build without the exact solver"
)]
fn exact_solver(settings: SolverSettings) -> Result<Box<dyn FuelSolver>, CliError> {
    use refuel_solver_exact::{DiscretizationConfig, ExactSolver};

    let defaults = DiscretizationConfig::default();
    let config = settings
        .interval_miles
        .map_or(defaults, |miles| defaults.with_interval_miles(miles));
    Ok(Box::new(ExactSolver::with_config(config)))
}

#[cfg(not(feature = "solver-exact"))]
const fn exact_solver(_settings: SolverSettings) -> Result<Box<dyn FuelSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-exact",
        action: "the exact algorithm",
    })
}

#[cfg(feature = "solver-greedy")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "signature matches the build without the greedy solver"
)]
fn greedy_solver() -> Result<Box<dyn FuelSolver>, CliError> {
    Ok(Box::new(refuel_solver_greedy::GreedySolver::new()))
}

#[cfg(not(feature = "solver-greedy"))]
const fn greedy_solver() -> Result<Box<dyn FuelSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-greedy",
        action: "the greedy algorithm",
    })
}

#[cfg(test)]
pub(crate) fn plan_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
