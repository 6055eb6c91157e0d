//! Exit point editing.

use std::sync::Arc;

use portal2exit_domain::Location;

use crate::infrastructure::ports::ActorHandle;
use crate::stores::{lock, PortalRegistry};

use super::{can_edit, edit, ManagementError};

/// An exit point removed by proximity.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedExit {
    pub portal: String,
    pub location: Location,
    /// Exit points the portal still has
    pub remaining: usize,
}

pub struct ExitPoints {
    registry: Arc<PortalRegistry>,
    removal_radius: f64,
}

impl ExitPoints {
    pub fn new(registry: Arc<PortalRegistry>, removal_radius: f64) -> Self {
        Self {
            registry,
            removal_radius,
        }
    }

    /// Add an exit point. Returns the new count, or an error for a
    /// duplicate point.
    pub fn add(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        location: Location,
    ) -> Result<usize, ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            if p.add_exit_point(location) {
                Ok(p.exit_points().len())
            } else {
                Err(ManagementError::InvalidInput(
                    "That exit point already exists".into(),
                ))
            }
        })?
    }

    /// Remove the exit point at `index` (zero based).
    pub fn remove_at(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        index: usize,
    ) -> Result<Location, ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            let count = p.exit_points().len();
            p.remove_exit_point_at(index).ok_or_else(|| {
                ManagementError::InvalidInput(format!(
                    "Exit point {} does not exist (portal has {})",
                    index + 1,
                    count
                ))
            })
        })?
    }

    /// Remove the exit point nearest to `at`, across every portal the
    /// actor may edit, if it lies within the removal radius.
    pub fn remove_nearest(
        &self,
        actor: &dyn ActorHandle,
        at: &Location,
    ) -> Result<RemovedExit, ManagementError> {
        let radius = self.removal_radius;
        let nearest = self
            .registry
            .list()
            .into_iter()
            .filter(|portal| can_edit(actor, portal))
            .filter_map(|portal| {
                let (point, distance) = portal
                    .exit_points()
                    .iter()
                    .filter_map(|point| Some((point.clone(), point.distance(at)?)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))?;
                Some((portal.name().to_string(), point, distance))
            })
            .filter(|(_, _, distance)| *distance <= radius)
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let Some((name, point, _)) = nearest else {
            return Err(ManagementError::NoExitNearby { radius });
        };

        // The portal may have been edited since the listing.
        let handle = self
            .registry
            .get(&name)
            .ok_or_else(|| ManagementError::NotFound(name.clone()))?;
        let mut portal = lock(&handle);
        if !portal.remove_exit_point(&point) {
            return Err(ManagementError::NoExitNearby { radius });
        }
        Ok(RemovedExit {
            portal: name,
            location: point,
            remaining: portal.exit_points().len(),
        })
    }

    /// Remove all exit points. Returns how many were removed.
    pub fn clear(&self, actor: &dyn ActorHandle, portal: &str) -> Result<usize, ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            let removed = p.exit_points().len();
            p.clear_exit_points();
            removed
        })
    }

    /// Current exit points, in order.
    pub fn list(&self, portal: &str) -> Result<Vec<Location>, ManagementError> {
        self.registry
            .get(portal)
            .map(|handle| lock(&handle).exit_points().to_vec())
            .ok_or_else(|| ManagementError::NotFound(portal.to_string()))
    }
}
