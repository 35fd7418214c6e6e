//! Backend API client and wire types.

mod client;
mod types;

pub use client::ArenaClient;
pub use types::*;
