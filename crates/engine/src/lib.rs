//! Portal2Exit Engine library.
//!
//! Resolves portal teleports for a block-world game server. The host server
//! is reached only through the port traits in `infrastructure::ports`.
//!
//! ## Structure
//!
//! - `stores/` - In-memory portal registry and cooldown table
//! - `use_cases/` - Teleport pipeline, portal management, movement trigger
//! - `infrastructure/` - Ports, settings, clock/random, JSON persistence
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// In-memory fakes for pipeline tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, HostPorts};
