//! Side-by-side comparison of simulations.

mod group;
mod ranking;

pub use group::group_simulations;
pub use ranking::{ComparisonTable, Highlight, SortField, SortState};
