//! Fake actor and block grid.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use portal2exit_domain::{ActorId, BlockPos, ItemStack, Location, Material};

use crate::infrastructure::ports::{ActorHandle, BlockSample, WorldQuery};

/// An actor with a real inventory that remembers where it was moved.
pub struct FakeActor {
    id: ActorId,
    name: String,
    location: Mutex<Option<Location>>,
    permissions: HashSet<String>,
    inventory: Mutex<Vec<Option<ItemStack>>>,
    bed: Option<Location>,
    accepts_moves: AtomicBool,
    moves: Mutex<Vec<Location>>,
}

impl FakeActor {
    pub fn new(name: &str) -> Self {
        Self {
            id: ActorId::new(),
            name: name.to_string(),
            location: Mutex::new(None),
            permissions: HashSet::new(),
            inventory: Mutex::new(vec![None; 36]),
            bed: None,
            accepts_moves: AtomicBool::new(true),
            moves: Mutex::new(Vec::new()),
        }
    }

    pub fn with_id(mut self, id: ActorId) -> Self {
        self.id = id;
        self
    }

    pub fn at(self, location: Location) -> Self {
        *self.location.lock().unwrap() = Some(location);
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    /// Fill inventory slots from the front.
    pub fn with_items(self, stacks: Vec<ItemStack>) -> Self {
        {
            let mut inventory = self.inventory.lock().unwrap();
            for (slot, stack) in stacks.into_iter().enumerate() {
                inventory[slot] = Some(stack);
            }
        }
        self
    }

    pub fn with_bed(mut self, bed: Location) -> Self {
        self.bed = Some(bed);
        self
    }

    pub fn rejecting_moves(self) -> Self {
        self.accepts_moves.store(false, Ordering::SeqCst);
        self
    }

    pub fn moves(&self) -> Vec<Location> {
        self.moves.lock().unwrap().clone()
    }

    pub fn current_inventory(&self) -> Vec<Option<ItemStack>> {
        self.inventory.lock().unwrap().clone()
    }

    /// Total amount of `material` across the inventory.
    pub fn count(&self, material: &str) -> u32 {
        let wanted = super::material(material);
        self.inventory
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .filter(|s| s.material == wanted)
            .map(|s| s.amount)
            .sum()
    }
}

impl ActorHandle for FakeActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.lock().unwrap().clone()
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn inventory(&self) -> Vec<Option<ItemStack>> {
        self.current_inventory()
    }

    fn set_slot(&self, slot: usize, stack: Option<ItemStack>) {
        let mut inventory = self.inventory.lock().unwrap();
        if slot < inventory.len() {
            inventory[slot] = stack;
        }
    }

    fn bed_location(&self) -> Option<Location> {
        self.bed.clone()
    }

    fn teleport(&self, destination: &Location) -> bool {
        if !self.accepts_moves.load(Ordering::SeqCst) {
            return false;
        }
        *self.location.lock().unwrap() = Some(destination.clone());
        self.moves.lock().unwrap().push(destination.clone());
        true
    }
}

/// Block grid: solid stone at or below `floor_y`, air above, plus
/// explicit overrides. Worlds listed as unloaded answer `None`.
pub struct GridWorld {
    floor_y: Option<i32>,
    floor: BlockSample,
    blocks: Mutex<HashMap<(String, BlockPos), BlockSample>>,
    spawns: HashMap<String, Location>,
    unloaded: HashSet<String>,
    online: Vec<ActorId>,
}

impl GridWorld {
    /// All air, everywhere.
    pub fn empty() -> Self {
        Self {
            floor_y: None,
            floor: BlockSample::new(super::material("STONE"), true),
            blocks: Mutex::new(HashMap::new()),
            spawns: HashMap::new(),
            unloaded: HashSet::new(),
            online: Vec::new(),
        }
    }

    /// Stone up to and including `floor_y` in every world.
    pub fn flat(floor_y: i32) -> Self {
        Self {
            floor_y: Some(floor_y),
            ..Self::empty()
        }
    }

    pub fn with_spawn(mut self, spawn: Location) -> Self {
        self.spawns.insert(spawn.world.clone(), spawn);
        self
    }

    pub fn with_unloaded(mut self, world: &str) -> Self {
        self.unloaded.insert(world.to_string());
        self
    }

    pub fn with_online(mut self, actor: ActorId) -> Self {
        self.online.push(actor);
        self
    }

    pub fn set(&self, world: &str, pos: BlockPos, material: &str, solid: bool) {
        self.blocks.lock().unwrap().insert(
            (world.to_string(), pos),
            BlockSample::new(super::material(material), solid),
        );
    }

    pub fn set_air(&self, world: &str, pos: BlockPos) {
        self.set(world, pos, Material::air().as_str(), false);
    }
}

impl WorldQuery for GridWorld {
    fn block_at(&self, world: &str, pos: BlockPos) -> Option<BlockSample> {
        if self.unloaded.contains(world) {
            return None;
        }
        if let Some(sample) = self.blocks.lock().unwrap().get(&(world.to_string(), pos)) {
            return Some(sample.clone());
        }
        match self.floor_y {
            Some(floor_y) if pos.y <= floor_y => Some(self.floor.clone()),
            _ => Some(BlockSample::air()),
        }
    }

    fn spawn_point(&self, world: &str) -> Option<Location> {
        self.spawns.get(world).cloned()
    }

    fn online_actors(&self) -> Vec<ActorId> {
        self.online.clone()
    }
}
