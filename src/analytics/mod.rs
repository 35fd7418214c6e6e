//! Client-side aggregation over simulation positions and snapshots.
//!
//! Everything here is pure: the same inputs always give the same rows.

mod benchmark;
mod monthly;
mod portfolio;
mod sector;
mod signals;

pub use benchmark::compare_to_benchmark;
pub use monthly::{monthly_pnl, monthly_trade_frequency};
pub use portfolio::{
    portfolio_composition, position_concentration, positions_for_snapshot, unrealized_estimate,
};
pub use sector::{sector_allocation, sector_performance};
pub use signals::summarize_live20;
