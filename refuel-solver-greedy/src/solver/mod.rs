//! `GreedySolver`: single forward pass with a bounded lookahead.

use refuel_core::{Algorithm, FUEL_EPSILON, FuelSolver, PlanError, Refuel, SolveInput};

use crate::window::{cheapest, first_cheaper, reachable};

/// Heuristic refuelling strategy.
///
/// The vehicle walks the route once. Standing at a station, it looks at
/// every station reachable on a full tank and heads for the nearest one
/// that is strictly cheaper, buying only what the leg needs. With nothing
/// cheaper ahead it buys just enough to finish when the destination is in
/// range, and otherwise settles for the cheapest station in the window.
/// Before the first stop there is no reference price, so the nearest
/// station reachable on the initial fuel is taken.
///
/// The result is fuel-feasible but not always the cheapest; use the exact
/// solver when cost matters more than speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedySolver;

impl GreedySolver {
    /// Construct the solver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FuelSolver for GreedySolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Greedy
    }

    fn solve(&self, input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError> {
        let stations = input.stations();
        let vehicle = input.vehicle();
        let total = input.route_miles();
        let full_range = vehicle.range_miles();

        let mut fuel = vehicle.initial_fuel_gallons();
        let mut position = 0.0_f64;
        let mut current: Option<usize> = None;
        let mut refuels = Vec::new();

        loop {
            let remaining = total - position;
            let target = match current {
                None => {
                    let range = fuel * vehicle.miles_per_gallon();
                    if remaining <= range + FUEL_EPSILON {
                        break;
                    }
                    let mut window = reachable(stations, None, position + range);
                    let Some((index, _)) = window.next() else {
                        return Err(stalled(position + range));
                    };
                    index
                }
                Some(here) => {
                    let reference = stations.get(here).map_or(f64::INFINITY, |s| s.price());
                    let limit = position + full_range;
                    if let Some(next) = first_cheaper(reachable(stations, current, limit), reference)
                    {
                        next
                    } else if remaining <= full_range + FUEL_EPSILON {
                        buy(&mut refuels, &mut fuel, here, vehicle.gallons_for(remaining));
                        break;
                    } else if let Some(next) = cheapest(reachable(stations, current, limit)) {
                        next
                    } else {
                        return Err(stalled(limit));
                    }
                }
            };

            let Some(station) = stations.get(target) else {
                return Err(stalled(position));
            };
            let leg = vehicle.gallons_for(station.distance_along_route_miles - position);
            if let Some(here) = current {
                buy(&mut refuels, &mut fuel, here, leg);
            }
            fuel = (fuel - leg).max(0.0);
            position = station.distance_along_route_miles;
            current = Some(target);
        }

        log::debug!(
            "greedy walk over {total:.1} mi bought fuel at {} stations",
            refuels.len()
        );
        Ok(refuels)
    }
}

/// Top the tank up to `needed` gallons at `station`; zero purchases are
/// dropped.
fn buy(refuels: &mut Vec<Refuel>, fuel: &mut f64, station: usize, needed: f64) {
    let gallons = needed - *fuel;
    if gallons > FUEL_EPSILON {
        refuels.push(Refuel {
            station_index: station,
            gallons,
        });
        *fuel = needed;
    }
}

fn stalled(reach_miles: f64) -> PlanError {
    log::debug!("greedy walk stalled; nothing reachable beyond {reach_miles:.1} mi");
    PlanError::NoFeasiblePath {
        stalled_at_miles: Some(reach_miles),
    }
}
