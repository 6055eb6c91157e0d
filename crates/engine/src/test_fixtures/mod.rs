//! In-memory fakes and builders for engine tests.
//!
//! Mocks prove individual port calls; these fakes hold real state so the
//! whole teleport pipeline can run end to end.
//!
//! ```rust,ignore
//! use crate::test_fixtures::{portals, FakeActor, GridWorld};
//!
//! let world = GridWorld::flat(63).with_spawn(portals::at("world", 0.0, 64.0, 0.0));
//! let actor = FakeActor::new("Steve").at(portals::at("world", 3.0, 64.0, 3.0));
//! ```

pub mod host;
pub mod portals;
pub mod services;

pub use host::{FakeActor, GridWorld};
pub use services::{LedgerEconomy, RecordingKits};

use portal2exit_domain::{ItemStack, Material};

/// Shorthand for a material in tests.
pub fn material(name: &str) -> Material {
    Material::new(name).unwrap()
}

/// Shorthand for a plain item stack.
pub fn stack(name: &str, amount: u32) -> ItemStack {
    ItemStack::new(material(name), amount)
}
