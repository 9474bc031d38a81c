//! Discretizer and graph builder.
//!
//! The route becomes an ordered list of [`GraphNode`]s: the start, every
//! station position, a regular grid of waypoints, and the destination.
//!
//! Fuel levels are breakpoints rather than a uniform bucket grid. Some
//! cheapest plan only ever leaves a station with a full tank or with just
//! enough fuel to reach a later station or the destination, so each node
//! carries exactly the levels the vehicle can hold there under such plans:
//!
//! - the initial fuel less the drive from the start;
//! - a full tank bought at an earlier station, less the drive from it;
//! - the fuel needed to reach a later station or the destination.
//!
//! Driving to the next node maps each level onto the same kind of level
//! there, so drive edges carry exact fuel deltas. Waypoints never change
//! the optimum: a finer grid adds nodes and states but not cost.

use std::cmp::Ordering;

use refuel_core::{FUEL_EPSILON, PlanError, ProjectedStation, SolveInput};

/// Default spacing between grid waypoints.
pub const DEFAULT_INTERVAL_MILES: f64 = 25.0;

/// Default cap on `(node, fuel level, phase)` states.
pub const DEFAULT_MAX_STATES: usize = 8_000_000;

/// States per `(node, fuel level)` pair: arrived and refuelling.
pub(crate) const PHASES: usize = 2;

/// Discretization settings for [`crate::ExactSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretizationConfig {
    /// Spacing of the waypoint grid along the route.
    pub interval_miles: f64,
    /// Largest state space the solver will search.
    pub max_states: usize,
}

impl Default for DiscretizationConfig {
    fn default() -> Self {
        Self {
            interval_miles: DEFAULT_INTERVAL_MILES,
            max_states: DEFAULT_MAX_STATES,
        }
    }
}

impl DiscretizationConfig {
    /// Override the grid spacing.
    #[must_use]
    pub const fn with_interval_miles(mut self, interval_miles: f64) -> Self {
        self.interval_miles = interval_miles;
        self
    }

    /// Override the state budget.
    #[must_use]
    pub const fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidParameters`] for a non-positive interval
    /// or a zero state budget.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.interval_miles.is_finite() && self.interval_miles > 0.0) {
            return Err(PlanError::invalid("interval_miles", "must be positive"));
        }
        if self.max_states == 0 {
            return Err(PlanError::invalid("max_states", "must be positive"));
        }
        Ok(())
    }
}

/// One position of the discretized route.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Distance from the route start.
    pub position_miles: f64,
    /// Index into [`SolveInput::stations`] of the station sold here.
    pub station: Option<usize>,
    /// Price per gallon, for station nodes.
    pub price_per_gallon: Option<f64>,
    /// Fuel levels representable here, ascending, in gallons.
    pub levels: Vec<f64>,
}

impl GraphNode {
    /// Index of the level matching `gallons`, if any.
    ///
    /// Values a hair below zero count as an empty tank.
    #[must_use]
    pub fn level_index(&self, gallons: f64) -> Option<usize> {
        if gallons < -FUEL_EPSILON {
            return None;
        }
        let target = gallons.max(0.0);
        let upper = self.levels.partition_point(|&level| level < target);
        [upper.checked_sub(1), Some(upper)]
            .into_iter()
            .flatten()
            .filter_map(|index| Some((index, self.levels.get(index)?)))
            .filter(|(_, level)| (*level - target).abs() <= LEVEL_TOLERANCE)
            .min_by(|a, b| (a.1 - target).abs().total_cmp(&(b.1 - target).abs()))
            .map(|(index, _)| index)
    }
}

/// Distance below which two fuel levels are the same level.
const LEVEL_TOLERANCE: f64 = 1e-7;

/// Discretized route ready for the shortest-path search.
#[derive(Debug, Clone)]
pub struct FuelGraph {
    nodes: Vec<GraphNode>,
    offsets: Vec<usize>,
    state_count: usize,
    miles_per_gallon: f64,
    initial_level: usize,
}

impl FuelGraph {
    /// Discretize `input` according to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidParameters`] when `config` is invalid or
    /// the resulting state space exceeds `config.max_states`.
    pub fn build(input: &SolveInput<'_>, config: &DiscretizationConfig) -> Result<Self, PlanError> {
        config.validate()?;
        let vehicle = input.vehicle();
        let total = input.route_miles();

        let mut positions = grid_positions(total, config)?;
        positions.extend(
            input
                .stations()
                .iter()
                .enumerate()
                .map(|(index, station)| {
                    (station.distance_along_route_miles.clamp(0.0, total), Some(index))
                }),
        );
        // Stations sort ahead of waypoints at the same position.
        positions.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| b.1.is_some().cmp(&a.1.is_some()))
        });
        let merged = merge_positions(positions, input.stations(), total);

        let breakpoints = Breakpoints {
            capacity: vehicle.tank_capacity_gallons(),
            miles_per_gallon: vehicle.miles_per_gallon(),
            initial: vehicle.initial_fuel_gallons(),
            stations: merged
                .iter()
                .filter(|(_, station)| station.is_some())
                .map(|(position, _)| *position)
                .collect(),
            total,
        };

        let mut nodes = Vec::with_capacity(merged.len());
        let mut offsets = Vec::with_capacity(merged.len());
        let mut state_count = 0_usize;
        for (position_miles, station) in merged {
            let levels = breakpoints.levels_at(position_miles);
            offsets.push(state_count);
            state_count = levels
                .len()
                .checked_mul(PHASES)
                .and_then(|states| state_count.checked_add(states))
                .filter(|&count| count <= config.max_states)
                .ok_or_else(state_budget_exceeded)?;
            let price_per_gallon = station
                .and_then(|index| input.stations().get(index))
                .map(ProjectedStation::price);
            nodes.push(GraphNode {
                position_miles,
                station,
                price_per_gallon,
                levels,
            });
        }

        let initial_level = nodes
            .first()
            .and_then(|start| start.level_index(vehicle.initial_fuel_gallons()))
            .ok_or_else(PlanError::no_feasible_path)?;

        log::debug!(
            "discretized {total:.1} mi into {} nodes and {state_count} states",
            nodes.len()
        );
        Ok(Self {
            nodes,
            offsets,
            state_count,
            miles_per_gallon: vehicle.miles_per_gallon(),
            initial_level,
        })
    }

    /// Nodes in route order; the first is the start and the last the
    /// destination.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Total number of search states.
    #[must_use]
    pub const fn state_count(&self) -> usize {
        self.state_count
    }

    /// Index of the initial fuel among the start node's levels.
    #[must_use]
    pub const fn initial_level(&self) -> usize {
        self.initial_level
    }

    /// Gallons burnt driving from `node` to the one after it.
    pub(crate) fn drive_gallons(&self, node: usize) -> Option<f64> {
        let here = self.nodes.get(node)?;
        let ahead = self.nodes.get(node + 1)?;
        Some((ahead.position_miles - here.position_miles) / self.miles_per_gallon)
    }

    /// Dense index of `(node, level, phase)`.
    pub(crate) fn state_index(&self, node: usize, level: usize, phase: usize) -> Option<usize> {
        let offset = *self.offsets.get(node)?;
        let levels = self.nodes.get(node)?.levels.len();
        (level < levels && phase < PHASES).then(|| offset + level * PHASES + phase)
    }

    /// Inverse of [`FuelGraph::state_index`].
    pub(crate) fn decode_state(&self, index: usize) -> Option<(usize, usize, usize)> {
        let node = self.offsets.partition_point(|&offset| offset <= index).checked_sub(1)?;
        let local = index.checked_sub(*self.offsets.get(node)?)?;
        let level = local.checked_div(PHASES)?;
        let phase = local.checked_rem(PHASES)?;
        Some((node, level, phase))
    }
}

/// Inputs shared by every node's level set.
struct Breakpoints {
    capacity: f64,
    miles_per_gallon: f64,
    initial: f64,
    /// Station node positions, ascending.
    stations: Vec<f64>,
    total: f64,
}

impl Breakpoints {
    /// Ascending, deduplicated levels at `position`.
    fn levels_at(&self, position: f64) -> Vec<f64> {
        let range = self.capacity * self.miles_per_gallon;
        let from_start = self.initial - position / self.miles_per_gallon;
        let full_from_behind = self
            .stations
            .iter()
            .filter(|&&station| station <= position + FUEL_EPSILON)
            .map(|&station| self.capacity - (position - station) / self.miles_per_gallon);
        let to_ahead = self
            .stations
            .iter()
            .copied()
            .chain(std::iter::once(self.total))
            .filter(|&target| target >= position - FUEL_EPSILON && target - position <= range + FUEL_EPSILON)
            .map(|target| (target - position) / self.miles_per_gallon);

        let mut levels: Vec<f64> = std::iter::once(from_start)
            .chain(full_from_behind)
            .chain(to_ahead)
            .filter(|&level| level >= -FUEL_EPSILON && level <= self.capacity + FUEL_EPSILON)
            .map(|level| level.clamp(0.0, self.capacity))
            .collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup_by(|later, earlier| (*later - *earlier).abs() <= FUEL_EPSILON);
        levels
    }
}

fn state_budget_exceeded() -> PlanError {
    PlanError::invalid(
        "max_states",
        "discretization exceeds the state budget; use a wider interval or raise max_states",
    )
}

/// Start, grid waypoints strictly inside the route, and destination.
fn grid_positions(
    total: f64,
    config: &DiscretizationConfig,
) -> Result<Vec<(f64, Option<usize>)>, PlanError> {
    let mut positions = vec![(0.0, None)];
    let mut k: u32 = 1;
    loop {
        let position = config.interval_miles * f64::from(k);
        if position >= total - FUEL_EPSILON {
            break;
        }
        positions.push((position, None));
        if positions.len() > config.max_states {
            return Err(state_budget_exceeded());
        }
        k = k.checked_add(1).ok_or_else(state_budget_exceeded)?;
    }
    positions.push((total, None));
    Ok(positions)
}

/// Collapse positions closer than [`FUEL_EPSILON`] into a single node.
///
/// A station position replaces a waypoint; co-located stations keep the
/// cheapest one.
fn merge_positions(
    positions: Vec<(f64, Option<usize>)>,
    stations: &[ProjectedStation],
    total: f64,
) -> Vec<(f64, Option<usize>)> {
    let mut merged: Vec<(f64, Option<usize>)> = Vec::with_capacity(positions.len());
    for (position, station) in positions {
        match merged.last_mut() {
            Some(last) if (position - last.0).abs() <= FUEL_EPSILON => {
                let Some(candidate) = station else {
                    continue;
                };
                let keep_existing = last.1.is_some_and(|current| {
                    cheaper_station(stations, current, candidate) != Ordering::Greater
                });
                if !keep_existing {
                    *last = (position, Some(candidate));
                }
            }
            _ => merged.push((position, station)),
        }
    }
    // Endpoints stay pinned even when a station snapped onto them.
    if let Some(first) = merged.first_mut() {
        first.0 = 0.0;
    }
    if let Some(last) = merged.last_mut() {
        last.0 = total;
    }
    merged
}

/// Preference order among stations sharing a node.
fn cheaper_station(stations: &[ProjectedStation], a: usize, b: usize) -> Ordering {
    match (stations.get(a), stations.get(b)) {
        (Some(x), Some(y)) => x
            .price()
            .total_cmp(&y.price())
            .then_with(|| x.distance_from_route_km.total_cmp(&y.distance_from_route_km))
            .then_with(|| x.id().cmp(&y.id())),
        _ => a.cmp(&b),
    }
}

/// Round a non-negative amount to millionths.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "amounts are finite, non-negative and bounded by tank and price validation"
)]
pub(crate) fn micros(amount: f64) -> u64 {
    (amount * 1_000_000.0).round().max(0.0) as u64
}
