//! Plan assembler: turns solver decisions into a route-relative report.

use crate::{Algorithm, ProjectedStation, Refuel, SolveInput, VehicleProfile};

/// One stop at which fuel is bought.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStop {
    /// Station visited.
    pub station: ProjectedStation,
    /// Fuel in the tank on arrival, in gallons.
    pub arrival_fuel_gallons: f64,
    /// Gallons bought at this stop.
    pub gallons_purchased: f64,
    /// Fuel in the tank when leaving, in gallons.
    pub departure_fuel_gallons: f64,
    /// Money spent at this stop.
    pub cost: f64,
    /// Money spent up to and including this stop.
    pub cumulative_cost: f64,
}

impl PlanStop {
    /// Road distance from the route start in miles.
    #[must_use]
    pub const fn distance_along_route_miles(&self) -> f64 {
        self.station.distance_along_route_miles
    }
}

/// Every projected station, flagged by whether the plan uses it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationReport {
    /// Candidate station.
    pub station: ProjectedStation,
    /// Whether fuel is bought here.
    pub selected: bool,
    /// Gallons bought here, zero when unselected.
    pub gallons_purchased: f64,
    /// Money spent here, zero when unselected.
    pub cost: f64,
}

/// A complete refuelling plan for one route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// Strategy that produced the plan.
    pub algorithm: Algorithm,
    /// Route length in miles.
    pub route_miles: f64,
    /// Vehicle the plan was computed for.
    pub vehicle: VehicleProfile,
    /// Stops in route order.
    pub stops: Vec<PlanStop>,
    /// Total money spent.
    pub total_cost: f64,
    /// Total gallons bought.
    pub total_gallons: f64,
    /// Fuel left on arrival at the destination.
    pub final_fuel_gallons: f64,
    /// All candidate stations with selection flags.
    pub stations: Vec<StationReport>,
}

impl Plan {
    /// Number of stops at which fuel is bought.
    #[must_use]
    pub const fn fuel_stops_count(&self) -> usize {
        self.stops.len()
    }

    /// Fuel in the tank at the route start.
    #[must_use]
    pub const fn initial_fuel_gallons(&self) -> f64 {
        self.vehicle.initial_fuel_gallons()
    }
}

/// Stations near a route, without cost optimisation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyStations {
    /// Route length in miles.
    pub route_miles: f64,
    /// Corridor used for filtering, in kilometres.
    pub max_corridor_km: f64,
    /// Stations in route order.
    pub stations: Vec<ProjectedStation>,
}

/// Build a [`Plan`] from a solver's ordered purchases.
///
/// Repeated purchases at the same station are merged into one stop and
/// zero-gallon purchases are ignored. Arrival fuel is simulated from the
/// vehicle's initial level and the station positions; the assembler does not
/// re-check feasibility.
#[must_use]
pub fn assemble_plan(input: &SolveInput<'_>, algorithm: Algorithm, refuels: &[Refuel]) -> Plan {
    let vehicle = input.vehicle();
    let stations = input.stations();
    let mut purchased = vec![0.0_f64; stations.len()];
    let mut order: Vec<usize> = Vec::new();
    for refuel in refuels.iter().filter(|refuel| refuel.gallons > 0.0) {
        let Some(slot) = purchased.get_mut(refuel.station_index) else {
            continue;
        };
        *slot += refuel.gallons;
        if !order.contains(&refuel.station_index) {
            order.push(refuel.station_index);
        }
    }

    let mut fuel = vehicle.initial_fuel_gallons();
    let mut position = 0.0;
    let mut cumulative_cost = 0.0;
    let mut stops = Vec::with_capacity(order.len());
    for index in order {
        let (Some(station), Some(&gallons)) = (stations.get(index), purchased.get(index)) else {
            continue;
        };
        fuel -= vehicle.gallons_for(station.distance_along_route_miles - position);
        position = station.distance_along_route_miles;
        let cost = gallons * station.price();
        cumulative_cost += cost;
        stops.push(PlanStop {
            station: station.clone(),
            arrival_fuel_gallons: fuel,
            gallons_purchased: gallons,
            departure_fuel_gallons: fuel + gallons,
            cost,
            cumulative_cost,
        });
        fuel += gallons;
    }
    let final_fuel_gallons = fuel - vehicle.gallons_for(input.route_miles() - position);

    let reports = stations
        .iter()
        .zip(&purchased)
        .map(|(station, &gallons)| StationReport {
            station: station.clone(),
            selected: gallons > 0.0,
            gallons_purchased: gallons,
            cost: gallons * station.price(),
        })
        .collect();

    Plan {
        algorithm,
        route_miles: input.route_miles(),
        vehicle: *vehicle,
        total_gallons: stops.iter().map(|stop| stop.gallons_purchased).sum(),
        total_cost: cumulative_cost,
        stops,
        final_fuel_gallons,
        stations: reports,
    }
}
