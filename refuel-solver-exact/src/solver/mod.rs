//! `ExactSolver`: minimum-cost refuelling via Dijkstra.

use refuel_core::{Algorithm, FuelSolver, PlanError, Refuel, SolveInput};

use crate::graph::{DiscretizationConfig, FuelGraph};
use crate::search::cheapest_purchases;

/// Exact refuelling strategy.
///
/// The route is discretized into a [`FuelGraph`] and searched for the
/// cheapest purchase sequence. Ties on cost prefer fewer stops, then less
/// fuel bought, so less fuel is left in the tank at the destination.
///
/// # Examples
///
/// ```rust
/// use refuel_core::test_support::{projected_stations, straight_route};
/// use refuel_core::{FuelSolver, SolveInput, VehicleProfile};
/// use refuel_solver_exact::ExactSolver;
///
/// let route = straight_route(300.0);
/// let stations = projected_stations(&[(50.0, 4.0), (120.0, 3.5), (180.0, 4.5)]);
/// let vehicle = VehicleProfile::new(20.0, 10.0, Some(10.0))?;
/// let input = SolveInput::new(&route, &stations, &vehicle)?;
///
/// let refuels = ExactSolver::new().solve(&input)?;
/// let gallons: Vec<_> = refuels.iter().map(|r| r.gallons.round()).collect();
/// assert_eq!(gallons, vec![2.0, 18.0]);
/// # Ok::<(), refuel_core::PlanError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExactSolver {
    config: DiscretizationConfig,
}

impl ExactSolver {
    /// Construct a solver using the default discretization.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit discretization settings.
    #[must_use]
    pub const fn with_config(config: DiscretizationConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &DiscretizationConfig {
        &self.config
    }
}

impl FuelSolver for ExactSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Exact
    }

    fn solve(&self, input: &SolveInput<'_>) -> Result<Vec<Refuel>, PlanError> {
        let graph = FuelGraph::build(input, &self.config)?;
        let result = cheapest_purchases(&graph)?;
        log::debug!(
            "exact search settled {} of {} states; cost {} micro-dollars",
            result.settled_states,
            graph.state_count(),
            result.cost_micros
        );
        Ok(result
            .purchases
            .into_iter()
            .filter_map(|purchase| {
                let station_index = graph.nodes().get(purchase.node)?.station?;
                Some(Refuel {
                    station_index,
                    gallons: purchase.gallons,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests;
