//! Simulation return against a benchmark index (SPY, QQQ).

use rust_decimal::Decimal;

use crate::models::{BenchmarkPoint, Snapshot};

/// Final cumulative returns of a simulation and its benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkComparison {
    pub simulation_return_pct: Decimal,
    pub benchmark_return_pct: Decimal,
    /// Simulation minus benchmark, in percentage points
    pub excess_return_pct: Decimal,
}

/// Compare the last cumulative return of each series.
pub fn compare_to_benchmark(
    snapshots: &[Snapshot],
    benchmark: &[BenchmarkPoint],
) -> Option<BenchmarkComparison> {
    let simulation = snapshots.last()?.cumulative_return_pct?;
    let bench = benchmark.last()?.cumulative_return_pct?;

    Some(BenchmarkComparison {
        simulation_return_pct: simulation,
        benchmark_return_pct: bench,
        excess_return_pct: simulation.checked_sub(bench)?,
    })
}
