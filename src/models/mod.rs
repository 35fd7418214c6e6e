//! Data models for simulations, positions, snapshots, Live20 runs and market data.

pub mod decimal;
mod live20;
mod market;
mod position;
mod simulation;
mod snapshot;
mod status;

pub use live20::{Direction, Live20Result, Live20Run};
pub use market::{BenchmarkPoint, Candle, IndicatorPoint};
pub use position::{Position, UNKNOWN_SECTOR};
pub use simulation::Simulation;
pub use snapshot::Snapshot;
pub use status::JobStatus;
