//! Dijkstra search over `(node, fuel level, phase)` states.
//!
//! A state in the *arrived* phase has just driven in; a state in the
//! *refuelling* phase has bought fuel at the current node. Buying from the
//! arrived phase opens a new stop, so the stop count in the label only
//! grows once per visit however many levels the purchase climbs.
//!
//! Refuel edges climb one level at a time. Their weights telescope: the
//! cost of raising the tank from level `a` to level `b` at one station is
//! the same whichever intermediate levels the path passes through.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use refuel_core::PlanError;

use crate::graph::{FuelGraph, micros};

const ARRIVED: usize = 0;
const REFUELLING: usize = 1;

/// Lexicographic path label: money first, then stops, then fuel bought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
struct Label {
    cost_micros: u64,
    stops: u32,
    bought_micro_gallons: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    label: Label,
    state: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by label.
        other
            .label
            .cmp(&self.label)
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fuel bought at one graph node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Purchase {
    pub node: usize,
    pub gallons: f64,
}

/// Cheapest purchase sequence reaching the destination.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchResult {
    pub purchases: Vec<Purchase>,
    pub cost_micros: u64,
    pub settled_states: usize,
}

/// Run Dijkstra from the start state to any destination state.
///
/// # Errors
///
/// Returns [`PlanError::NoFeasiblePath`] naming the furthest node reached
/// when no destination state is reachable.
pub(crate) fn cheapest_purchases(graph: &FuelGraph) -> Result<SearchResult, PlanError> {
    let nodes = graph.nodes();
    let destination = nodes.len().saturating_sub(1);
    let mut best: Vec<Option<Label>> = vec![None; graph.state_count()];
    let mut parent: Vec<Option<usize>> = vec![None; graph.state_count()];
    let mut queue = BinaryHeap::new();
    let mut furthest = 0_usize;
    let mut settled_states = 0_usize;

    let start = graph
        .state_index(0, graph.initial_level(), ARRIVED)
        .ok_or_else(PlanError::no_feasible_path)?;
    relax(&mut best, &mut queue, start, Label::default());

    while let Some(entry) = queue.pop() {
        match best.get(entry.state).copied().flatten() {
            Some(label) if label < entry.label => continue,
            Some(_) => {}
            None => continue,
        }
        let Some((node, level, phase)) = graph.decode_state(entry.state) else {
            continue;
        };
        settled_states += 1;
        furthest = furthest.max(node);
        if node == destination {
            return Ok(SearchResult {
                purchases: reconstruct(graph, &parent, entry.state),
                cost_micros: entry.label.cost_micros,
                settled_states,
            });
        }
        let Some(here) = nodes.get(node) else {
            continue;
        };
        let Some(&gallons) = here.levels.get(level) else {
            continue;
        };

        if let (Some(price), Some(&topped)) = (here.price_per_gallon, here.levels.get(level + 1)) {
            if let Some(next) = graph.state_index(node, level + 1, REFUELLING) {
                let label = Label {
                    cost_micros: entry
                        .label
                        .cost_micros
                        .saturating_add(micros(price * topped).saturating_sub(micros(price * gallons))),
                    stops: entry.label.stops.saturating_add(u32::from(phase == ARRIVED)),
                    bought_micro_gallons: entry
                        .label
                        .bought_micro_gallons
                        .saturating_add(micros(topped).saturating_sub(micros(gallons))),
                };
                if relax(&mut best, &mut queue, next, label) {
                    set_parent(&mut parent, next, entry.state);
                }
            }
        }

        let (Some(ahead), Some(drive)) = (nodes.get(node + 1), graph.drive_gallons(node)) else {
            continue;
        };
        let Some(remaining) = ahead.level_index(gallons - drive) else {
            continue;
        };
        if let Some(next) = graph.state_index(node + 1, remaining, ARRIVED) {
            if relax(&mut best, &mut queue, next, entry.label) {
                set_parent(&mut parent, next, entry.state);
            }
        }
    }

    let stalled_at = nodes.get(furthest).map(|n| n.position_miles);
    log::debug!("no feasible refuelling path; furthest node at {stalled_at:?} mi");
    Err(PlanError::NoFeasiblePath {
        stalled_at_miles: stalled_at,
    })
}

fn relax(
    best: &mut [Option<Label>],
    queue: &mut BinaryHeap<QueueEntry>,
    state: usize,
    label: Label,
) -> bool {
    let Some(slot) = best.get_mut(state) else {
        return false;
    };
    if slot.is_some_and(|current| current <= label) {
        return false;
    }
    *slot = Some(label);
    queue.push(QueueEntry { label, state });
    true
}

fn set_parent(parent: &mut [Option<usize>], state: usize, from: usize) {
    if let Some(slot) = parent.get_mut(state) {
        *slot = Some(from);
    }
}

/// Walk parent pointers back to the start and group refuel edges by node.
fn reconstruct(graph: &FuelGraph, parent: &[Option<usize>], goal: usize) -> Vec<Purchase> {
    let mut purchases: Vec<Purchase> = Vec::new();
    let mut current = goal;
    while let Some(previous) = parent.get(current).copied().flatten() {
        let (Some((node, level, _)), Some((prev_node, prev_level, _))) =
            (graph.decode_state(current), graph.decode_state(previous))
        else {
            break;
        };
        let levels = graph.nodes().get(node).map(|n| n.levels.as_slice());
        let bought = levels.and_then(|levels| Some(levels.get(level)? - levels.get(prev_level)?));
        if let Some(gallons) = bought.filter(|_| node == prev_node && level > prev_level) {
            match purchases.last_mut() {
                Some(purchase) if purchase.node == node => purchase.gallons += gallons,
                _ => purchases.push(Purchase { node, gallons }),
            }
        }
        current = previous;
    }
    purchases.reverse();
    purchases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DiscretizationConfig;
    use refuel_core::test_support::{projected_stations, straight_route};
    use refuel_core::{SolveInput, VehicleProfile};
    use rstest::rstest;

    fn search(
        miles: f64,
        stations: &[(f64, f64)],
        vehicle: VehicleProfile,
    ) -> Result<SearchResult, PlanError> {
        let route = straight_route(miles);
        let projected = projected_stations(stations);
        let input = SolveInput::new(&route, &projected, &vehicle).expect("valid input");
        let graph = FuelGraph::build(&input, &DiscretizationConfig::default()).expect("graph");
        cheapest_purchases(&graph)
    }

    #[rstest]
    fn heap_pops_the_smallest_label_first() {
        let mut heap = BinaryHeap::new();
        for (cost, state) in [(5, 0), (1, 1), (1, 0), (3, 2)] {
            heap.push(QueueEntry {
                label: Label {
                    cost_micros: cost,
                    ..Label::default()
                },
                state,
            });
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|entry| (entry.label.cost_micros, entry.state))
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (3, 2), (5, 0)]);
    }

    #[rstest]
    fn coasts_when_initial_fuel_suffices() {
        let vehicle = VehicleProfile::new(20.0, 10.0, Some(20.0)).expect("vehicle");
        let result = search(150.0, &[(50.0, 3.0)], vehicle).expect("feasible");
        assert!(result.purchases.is_empty());
        assert_eq!(result.cost_micros, 0);
    }

    #[rstest]
    fn buys_the_cheaper_fuel_first() {
        let vehicle = VehicleProfile::new(20.0, 10.0, Some(10.0)).expect("vehicle");
        let result = search(300.0, &[(50.0, 4.0), (120.0, 3.5), (180.0, 4.5)], vehicle)
            .expect("feasible");
        assert_eq!(result.cost_micros, 71_000_000);
        let bought: Vec<_> = result
            .purchases
            .iter()
            .map(|p| (p.gallons * 1000.0).round())
            .collect();
        assert_eq!(bought, vec![2000.0, 18000.0]);
    }

    #[rstest]
    fn fractional_initial_fuel_reaches_the_destination() {
        let vehicle = VehicleProfile::new(20.0, 10.0, Some(5.02)).expect("vehicle");
        let result = search(50.1, &[], vehicle).expect("5.02 gal covers 50.2 mi");
        assert!(result.purchases.is_empty());
        assert_eq!(result.cost_micros, 0);
    }

    #[rstest]
    fn reports_where_the_vehicle_stalls() {
        let vehicle = VehicleProfile::new(20.0, 10.0, Some(20.0)).expect("vehicle");
        let err = search(500.0, &[(50.0, 3.0), (300.0, 3.0)], vehicle).expect_err("gap too wide");
        assert_eq!(
            err,
            PlanError::NoFeasiblePath {
                stalled_at_miles: Some(250.0)
            }
        );
    }
}
