//! Host engine capabilities.
//!
//! The engine never talks to a game server directly. Actors and worlds are
//! reached through these traits, which a plugin bridge implements on top of
//! the real server API.

use portal2exit_domain::{ActorId, BlockPos, ItemStack, Location, Material};

/// Material and solidity of one block, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSample {
    pub material: Material,
    pub solid: bool,
}

impl BlockSample {
    pub fn new(material: Material, solid: bool) -> Self {
        Self { material, solid }
    }

    pub fn air() -> Self {
        Self::new(Material::air(), false)
    }
}

/// A live actor (player) in the host world.
#[cfg_attr(test, mockall::automock)]
pub trait ActorHandle: Send + Sync {
    fn id(&self) -> ActorId;

    fn name(&self) -> String;

    /// Current position; `None` when the host cannot resolve the actor's world.
    fn location(&self) -> Option<Location>;

    fn has_permission(&self, permission: &str) -> bool;

    /// Snapshot of inventory slots, in slot order.
    fn inventory(&self) -> Vec<Option<ItemStack>>;

    fn set_slot(&self, slot: usize, stack: Option<ItemStack>);

    /// Bound respawn point, if any.
    fn bed_location(&self) -> Option<Location>;

    /// Move the actor. Returns `false` if the host refused the move.
    fn teleport(&self, destination: &Location) -> bool;
}

/// Read-only queries against the host world.
#[cfg_attr(test, mockall::automock)]
pub trait WorldQuery: Send + Sync {
    /// `None` when the world is not loaded.
    fn block_at(&self, world: &str, pos: BlockPos) -> Option<BlockSample>;

    fn spawn_point(&self, world: &str) -> Option<Location>;

    fn online_actors(&self) -> Vec<ActorId>;
}
