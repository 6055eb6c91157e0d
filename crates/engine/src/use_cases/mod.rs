//! Use cases - user story orchestration.
//!
//! Each area owns its use case structs plus a container that `App` wires up:
//! - teleport: the portal teleport pipeline and its gates
//! - management: create/remove/edit/query portals
//! - movement: turns actor moves into teleport attempts

pub mod management;
pub mod movement;
pub mod permissions;
pub mod teleport;

pub use management::ManagementUseCases;
pub use movement::MovementUseCases;
pub use teleport::TeleportUseCases;
