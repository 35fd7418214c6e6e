//! Tracking long-running backend jobs until they finish.

mod poller;
mod source;
mod state;

pub use poller::Poller;
pub use source::{JobSource, Live20Jobs, SimulationJobs};
pub use state::PollPhase;
