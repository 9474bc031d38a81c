//! Criterion benchmarks for the exact solver.
//!
//! Measures solve time across route lengths (500, 1000, 2000 miles) with a
//! station roughly every 20 miles.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package refuel-solver-exact
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use refuel_core::test_support::straight_route;
use refuel_core::{FuelSolver, SolveInput, VehicleProfile};
use refuel_solver_exact::ExactSolver;


use bench_support::{BENCHMARK_SEED, generate_stations};

/// Route lengths to benchmark, in miles.
const ROUTE_LENGTHS: &[u32] = &[500, 1000, 2000];

fn bench_solve_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_solve_time");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    let vehicle = VehicleProfile::new(50.0, 10.0, Some(25.0)).expect("valid vehicle");
    let solver = ExactSolver::new();

    for &miles in ROUTE_LENGTHS {
        let route_miles = f64::from(miles);
        let route = straight_route(route_miles);
        let stations = generate_stations(route_miles, BENCHMARK_SEED);
        let input = SolveInput::new(&route, &stations, &vehicle).expect("valid input");

        group.throughput(Throughput::Elements(u64::from(miles)));
        group.bench_with_input(BenchmarkId::new("route_miles", miles), &input, |b, input| {
            b.iter(|| {
                #[expect(
                    clippy::let_underscore_must_use,
                    reason = "Benchmarking solve performance, result is intentionally discarded"
                )]
                let _ = solver.solve(input);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_times);
criterion_main!(benches);
