//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host game server (actors, worlds)
//! - External plugins (economy, kits)
//! - Portal storage (could swap JSON file -> database)
//! - Clock/Random (for testing)
//!
//! All ports are synchronous: a teleport attempt runs to completion on the
//! caller's thread.

mod error;
mod host;
mod services;
mod storage;
mod testing;

pub use error::{EconomyError, StoreError};
pub use host::{ActorHandle, BlockSample, WorldQuery};
pub use services::{EconomyService, KitService};
pub use storage::PortalStore;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use host::{MockActorHandle, MockWorldQuery};
#[cfg(test)]
pub use services::{MockEconomyService, MockKitService};
#[cfg(test)]
pub use storage::MockPortalStore;
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};
