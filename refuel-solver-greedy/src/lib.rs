//! Greedy lookahead refuelling solver.
//!
//! [`GreedySolver`] walks the projected stations once without building a
//! graph. It is fast and always fuel-feasible, but it may pay more than
//! the exact solver on routes where prices rise and fall.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod window;

pub use solver::GreedySolver;
