//! Portal registry - the single owner of all live portals.
//!
//! Portals are keyed case-insensitively. Each portal sits behind its own
//! mutex so that edits, cursor advances and snapshotting never interleave
//! on the same portal, while different portals stay independent.
//!
//! Never call back into the registry while holding a portal lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use portal2exit_domain::{ActorId, DomainError, Location, Portal, PortalKey};

/// Shared, lockable portal.
pub type PortalHandle = Arc<Mutex<Portal>>;

/// Lock a portal, recovering the data if a previous holder panicked.
pub fn lock(handle: &PortalHandle) -> MutexGuard<'_, Portal> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A portal found near a location, with its distance.
#[derive(Debug, Clone)]
pub struct NearbyPortal {
    pub handle: PortalHandle,
    pub distance: f64,
}

pub struct PortalRegistry {
    portals: DashMap<PortalKey, PortalHandle>,
}

impl PortalRegistry {
    pub fn new() -> Self {
        Self {
            portals: DashMap::new(),
        }
    }

    /// Register a portal. Names collide case-insensitively.
    pub fn insert(&self, portal: Portal) -> Result<PortalHandle, DomainError> {
        match self.portals.entry(portal.key()) {
            Entry::Occupied(_) => Err(DomainError::duplicate("Portal", portal.name().as_str())),
            Entry::Vacant(slot) => {
                let handle = Arc::new(Mutex::new(portal));
                slot.insert(handle.clone());
                Ok(handle)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<PortalHandle> {
        self.portals
            .get(&PortalKey::from_name(name))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.portals.contains_key(&PortalKey::from_name(name))
    }

    /// Remove a portal, returning its last state.
    pub fn remove(&self, name: &str) -> Option<Portal> {
        self.portals
            .remove(&PortalKey::from_name(name))
            .map(|(_, handle)| lock(&handle).clone())
    }

    /// Remove every portal; returns how many were removed.
    pub fn clear(&self) -> usize {
        let count = self.portals.len();
        self.portals.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }

    /// Copy of every portal, in no particular order.
    pub fn snapshot(&self) -> Vec<Portal> {
        self.handles().iter().map(|h| lock(h).clone()).collect()
    }

    /// Every portal, sorted by name.
    pub fn list(&self) -> Vec<Portal> {
        let mut portals = self.snapshot();
        portals.sort_by(|a, b| a.key().cmp(&b.key()));
        portals
    }

    /// Portals owned by `owner`, sorted by name.
    pub fn owned_by(&self, owner: ActorId) -> Vec<Portal> {
        let mut portals: Vec<Portal> = self
            .handles()
            .iter()
            .map(lock)
            .filter(|p| p.is_owned_by(owner))
            .map(|p| p.clone())
            .collect();
        portals.sort_by(|a, b| a.key().cmp(&b.key()));
        portals
    }

    pub fn count_owned_by(&self, owner: ActorId) -> usize {
        self.handles()
            .iter()
            .filter(|h| lock(h).is_owned_by(owner))
            .count()
    }

    /// The closest portal in the same world within `radius`.
    pub fn find_near(&self, location: &Location, radius: f64) -> Option<NearbyPortal> {
        self.handles()
            .into_iter()
            .filter_map(|handle| {
                let distance = lock(&handle).location().distance(location)?;
                (distance <= radius).then_some(NearbyPortal { handle, distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Replace the whole registry. Later duplicates of a name are dropped.
    pub fn load(&self, portals: Vec<Portal>) -> usize {
        self.portals.clear();
        let mut loaded = 0;
        for portal in portals {
            match self.insert(portal) {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!(error = %e, "Dropping duplicate portal on load"),
            }
        }
        loaded
    }

    /// Run `f` against a portal under its lock.
    pub fn with_portal_mut<R>(&self, name: &str, f: impl FnOnce(&mut Portal) -> R) -> Option<R> {
        let handle = self.get(name)?;
        let mut portal = lock(&handle);
        Some(f(&mut portal))
    }

    /// Clone out the handles so no map shard stays locked while portals are.
    fn handles(&self) -> Vec<PortalHandle> {
        self.portals
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for PortalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal2exit_domain::PortalName;

    fn portal(name: &str, owner: ActorId, x: f64) -> Portal {
        Portal::new(
            PortalName::new(name).unwrap(),
            Location::new("world", x, 64.0, 0.0),
            owner,
            Utc::now(),
        )
    }

    #[test]
    fn insert_rejects_case_insensitive_duplicates() {
        let registry = PortalRegistry::new();
        let owner = ActorId::new();
        registry.insert(portal("Hub", owner, 0.0)).unwrap();
        let err = registry.insert(portal("HUB", owner, 5.0)).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { .. }));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("hub").is_some());
    }

    #[test]
    fn remove_returns_last_state() {
        let registry = PortalRegistry::new();
        registry.insert(portal("Hub", ActorId::new(), 0.0)).unwrap();
        registry.with_portal_mut("hub", |p| p.set_cost(5.0).unwrap());
        let removed = registry.remove("HUB").unwrap();
        assert_eq!(removed.cost(), 5.0);
        assert!(registry.is_empty());
        assert!(registry.remove("Hub").is_none());
    }

    #[test]
    fn ownership_queries() {
        let registry = PortalRegistry::new();
        let alice = ActorId::new();
        let bob = ActorId::new();
        registry.insert(portal("Zeta", alice, 0.0)).unwrap();
        registry.insert(portal("Alpha", alice, 10.0)).unwrap();
        registry.insert(portal("Bobs", bob, 20.0)).unwrap();

        let names: Vec<String> = registry
            .owned_by(alice)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(registry.count_owned_by(bob), 1);
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn find_near_picks_closest_in_radius() {
        let registry = PortalRegistry::new();
        let owner = ActorId::new();
        registry.insert(portal("Near", owner, 3.0)).unwrap();
        registry.insert(portal("Nearer", owner, 1.0)).unwrap();
        registry.insert(portal("Far", owner, 40.0)).unwrap();

        let here = Location::new("world", 0.0, 64.0, 0.0);
        let found = registry.find_near(&here, 5.0).unwrap();
        assert_eq!(lock(&found.handle).name().as_str(), "Nearer");
        assert_eq!(found.distance, 1.0);

        let elsewhere = Location::new("world_nether", 0.0, 64.0, 0.0);
        assert!(registry.find_near(&elsewhere, 5.0).is_none());
    }

    #[test]
    fn load_replaces_contents() {
        let registry = PortalRegistry::new();
        let owner = ActorId::new();
        registry.insert(portal("Old", owner, 0.0)).unwrap();
        let loaded = registry.load(vec![
            portal("New", owner, 0.0),
            portal("Other", owner, 0.0),
            portal("new", owner, 1.0),
        ]);
        assert_eq!(loaded, 2);
        assert!(!registry.contains("Old"));
        assert!(registry.contains("NEW"));
        assert_eq!(registry.clear(), 2);
    }
}
