//! In-memory state storage modules.
//!
//! Stores manage runtime state shared across use cases:
//! - `PortalRegistry` - every live portal, individually lockable
//! - `CooldownStore` - per-actor teleport throttle

pub mod cooldown;
pub mod portal_registry;

// Re-export store types
pub use cooldown::CooldownStore;
pub use portal_registry::{lock, NearbyPortal, PortalHandle, PortalRegistry};
