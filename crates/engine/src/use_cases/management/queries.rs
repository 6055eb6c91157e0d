//! Read-only portal queries.

use std::sync::Arc;

use portal2exit_domain::{ActorId, Location, Portal};

use crate::stores::{lock, PortalRegistry};

pub struct PortalQueries {
    registry: Arc<PortalRegistry>,
    detection_radius: f64,
}

impl PortalQueries {
    pub fn new(registry: Arc<PortalRegistry>, detection_radius: f64) -> Self {
        Self {
            registry,
            detection_radius,
        }
    }

    pub fn get(&self, name: &str) -> Option<Portal> {
        self.registry.get(name).map(|handle| lock(&handle).clone())
    }

    /// Every portal, sorted by name.
    pub fn list_all(&self) -> Vec<Portal> {
        self.registry.list()
    }

    pub fn list_owned(&self, owner: ActorId) -> Vec<Portal> {
        self.registry.owned_by(owner)
    }

    /// Closest portal within the detection radius.
    pub fn portal_at(&self, location: &Location) -> Option<Portal> {
        self.find_near(location, self.detection_radius)
    }

    pub fn find_near(&self, location: &Location, radius: f64) -> Option<Portal> {
        self.registry
            .find_near(location, radius)
            .map(|nearby| lock(&nearby.handle).clone())
    }
}
