//! Exit resolution - where a portal sends a traveler.
//!
//! Spawn and bed exits depend on the host, so the resolver only says which
//! one to ask for. Custom and random exits are picked from the portal's
//! exit points here.

use std::sync::Arc;

use portal2exit_domain::{ExitType, Location, Portal, SelectionMode};

use crate::infrastructure::ports::RandomPort;

/// Result of resolving a portal's exit.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitResolution {
    /// A concrete exit point
    Point(Location),
    /// The spawn point of the traveler's world
    WorldSpawn,
    /// The traveler's bed, or world spawn when none is bound
    BedOrSpawn,
}

pub struct ExitResolver {
    random: Arc<dyn RandomPort>,
}

impl ExitResolver {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Resolve the exit for one traversal.
    ///
    /// `Sequential` mode advances the portal's cursor, so the caller must
    /// hold the portal's lock for the duration of this call.
    ///
    /// Returns `None` when a custom or random portal has neither exit points
    /// nor a legacy single exit.
    pub fn resolve(&self, portal: &mut Portal, traveler: &Location) -> Option<ExitResolution> {
        match portal.exit_type() {
            ExitType::Spawn => Some(ExitResolution::WorldSpawn),
            ExitType::Bed => Some(ExitResolution::BedOrSpawn),
            ExitType::Custom => self
                .by_selection_mode(portal, traveler)
                .map(ExitResolution::Point),
            // Same pick as Custom + Random mode, reached through the exit type.
            ExitType::Random => self.random_point(portal).map(ExitResolution::Point),
        }
    }

    fn by_selection_mode(&self, portal: &mut Portal, traveler: &Location) -> Option<Location> {
        if portal.exit_points().is_empty() {
            return portal.custom_exit().cloned();
        }
        match portal.selection_mode() {
            SelectionMode::First => portal.exit_points().first().cloned(),
            SelectionMode::Random => self.random_point(portal),
            SelectionMode::Sequential => portal.next_sequential_exit(),
            SelectionMode::Nearest => portal
                .nearest_exit_point(traveler)
                .or_else(|| portal.exit_points().first())
                .cloned(),
        }
    }

    fn random_point(&self, portal: &Portal) -> Option<Location> {
        let points = portal.exit_points();
        if points.is_empty() {
            return portal.custom_exit().cloned();
        }
        let index = self.random.gen_index(points.len()).min(points.len() - 1);
        points.get(index).cloned()
    }
}
