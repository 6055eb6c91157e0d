//! Portal domain model
//!
//! Pure types with no I/O: the `Portal` aggregate, the value objects it is
//! built from, and the shared `DomainError`.

pub mod aggregates;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{ExitType, Portal, SelectionMode};
pub use error::DomainError;
pub use ids::ActorId;
pub use value_objects::{
    BlockPos, ItemStack, Location, Material, PortalKey, PortalName, RequiredItem, SlotChange,
    StackChange, MAX_PORTAL_NAME_LENGTH, MIN_PORTAL_NAME_LENGTH,
};
