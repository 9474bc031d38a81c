//! Exact refuelling solver.
//!
//! This crate provides [`ExactSolver`], the [`FuelSolver`](refuel_core::FuelSolver)
//! implementation that returns the minimum-cost plan. It discretizes the
//! route into waypoints and station nodes, gives every node the fuel levels
//! a cheapest plan can hold there, and runs Dijkstra over
//! `(node, fuel level)` states. The waypoint interval changes the size of
//! the search but never its result.
//!
//! The state space is bounded by [`DiscretizationConfig::max_states`] so a
//! careless configuration fails fast with
//! [`PlanError::InvalidParameters`](refuel_core::PlanError::InvalidParameters)
//! instead of exhausting memory.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod graph;
mod search;
mod solver;

pub use graph::{
    DEFAULT_INTERVAL_MILES, DEFAULT_MAX_STATES, DiscretizationConfig, FuelGraph, GraphNode,
};
pub use solver::ExactSolver;
