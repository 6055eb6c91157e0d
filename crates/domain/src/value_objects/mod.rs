//! Value objects - Immutable objects defined by their attributes

mod item;
mod location;
mod material;
mod names;
mod quantity;

pub use item::{ItemStack, RequiredItem, SlotChange};
pub use location::{BlockPos, Location};
pub use material::Material;
pub use names::{PortalKey, PortalName, MAX_PORTAL_NAME_LENGTH, MIN_PORTAL_NAME_LENGTH};
pub use quantity::StackChange;
