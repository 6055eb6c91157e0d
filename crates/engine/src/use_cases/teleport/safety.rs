//! Safe landing search.
//!
//! A location is safe when the feet and head cells are passable and the
//! block underneath is solid ground that does not hurt. Material names are
//! matched by fragment so renamed variants across game versions still hit.

use std::sync::Arc;

use portal2exit_domain::Location;

use crate::infrastructure::app_settings::SafetySettings;
use crate::infrastructure::ports::{BlockSample, WorldQuery};

/// Non-solid blocks an actor can stand inside.
const PASSABLE: &[&str] = &["WATER", "GRASS", "VINE", "FERN", "TORCH", "SNOW"];

/// Ground that damages whoever stands on it.
const DANGEROUS: &[&str] = &["LAVA", "FIRE", "CACTUS", "MAGMA", "WITHER", "BERRY"];

pub struct SafetyLocator {
    world: Arc<dyn WorldQuery>,
}

impl SafetyLocator {
    pub fn new(world: Arc<dyn WorldQuery>) -> Self {
        Self { world }
    }

    /// Unloaded or unknown blocks count as unsafe.
    pub fn is_safe(&self, location: &Location) -> bool {
        let feet = location.block();
        let sample = |pos| self.world.block_at(&location.world, pos);

        let (Some(ground), Some(body), Some(head)) =
            (sample(feet.down()), sample(feet), sample(feet.up()))
        else {
            return false;
        };

        is_passable(&body) && is_passable(&head) && ground.solid && !is_dangerous(&ground)
    }

    /// First safe offset of `center` within `radius`.
    ///
    /// Scans upward layers first (y = 0..=radius), then downward
    /// (y = -1..=-radius); within a layer x is the outer loop and z the inner.
    pub fn find_safe(&self, center: &Location, radius: i32) -> Option<Location> {
        let radius = radius.max(0);
        let layers = (0..=radius).chain((1..=radius).map(|dy| -dy));
        for dy in layers {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    let candidate = center.offset(dx, dy, dz);
                    if self.is_safe(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }

    /// `candidate` if it is already safe, else the first safe spot found
    /// around it, else `candidate` unchanged.
    pub fn adjust(&self, candidate: Location, radius: i32) -> Location {
        if self.is_safe(&candidate) {
            return candidate;
        }
        match self.find_safe(&candidate, radius) {
            Some(safe) => safe,
            None => {
                tracing::debug!(
                    destination = %candidate,
                    radius,
                    "No safe location found, keeping destination"
                );
                candidate
            }
        }
    }

    /// Apply the configured safety policy to a destination.
    pub fn ensure_safe(&self, candidate: Location, settings: &SafetySettings) -> Location {
        if !settings.enabled || !settings.find_safe_location {
            return candidate;
        }
        let radius = i32::try_from(settings.effective_radius()).unwrap_or(i32::MAX);
        self.adjust(candidate, radius)
    }
}

fn is_passable(block: &BlockSample) -> bool {
    block.material.is_air() || (!block.solid && block.material.contains_any(PASSABLE))
}

fn is_dangerous(block: &BlockSample) -> bool {
    block.material.contains_any(DANGEROUS)
}
