//! Portal settings editing.

use std::sync::Arc;

use portal2exit_domain::{ExitType, RequiredItem, SelectionMode};

use crate::infrastructure::ports::ActorHandle;
use crate::stores::PortalRegistry;

use super::{edit, ManagementError};

pub struct PortalConfig {
    registry: Arc<PortalRegistry>,
}

impl PortalConfig {
    pub fn new(registry: Arc<PortalRegistry>) -> Self {
        Self { registry }
    }

    pub fn set_exit_type(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        exit_type: ExitType,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            p.set_exit_type(exit_type)
        })
    }

    pub fn cycle_exit_type(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
    ) -> Result<ExitType, ManagementError> {
        edit(&self.registry, actor, portal, |p| p.cycle_exit_type())
    }

    pub fn set_selection_mode(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        mode: SelectionMode,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            p.set_selection_mode(mode)
        })
    }

    pub fn cycle_selection_mode(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
    ) -> Result<SelectionMode, ManagementError> {
        edit(&self.registry, actor, portal, |p| p.cycle_selection_mode())
    }

    pub fn set_cost(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        cost: f64,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| p.set_cost(cost))?
            .map_err(ManagementError::from)
    }

    /// Add `delta` to the cost, flooring at zero. Returns the new cost.
    pub fn adjust_cost(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        delta: f64,
    ) -> Result<f64, ManagementError> {
        if !delta.is_finite() {
            return Err(ManagementError::InvalidInput(format!(
                "Invalid cost change: {}",
                delta
            )));
        }
        edit(&self.registry, actor, portal, |p| p.adjust_cost(delta))
    }

    pub fn set_particles(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        show: bool,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            p.set_show_particles(show)
        })
    }

    /// Flip particle display. Returns the new setting.
    pub fn toggle_particles(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
    ) -> Result<bool, ManagementError> {
        edit(&self.registry, actor, portal, |p| p.toggle_particles())
    }

    /// `None` or a blank string clears the requirement.
    pub fn set_required_permission(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        permission: Option<String>,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            p.set_required_permission(permission)
        })
    }

    pub fn set_required_kit(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        kit: Option<String>,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| p.set_required_kit(kit))
    }

    pub fn set_kit_to_give(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        kit: Option<String>,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| p.set_kit_to_give(kit))
    }

    /// Returns the number of required items after the add.
    pub fn add_required_item(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        item: RequiredItem,
    ) -> Result<usize, ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            if p.add_required_item(item) {
                Ok(p.required_items().len())
            } else {
                Err(ManagementError::InvalidInput(
                    "That item is already required".into(),
                ))
            }
        })?
    }

    pub fn remove_required_item(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
        index: usize,
    ) -> Result<RequiredItem, ManagementError> {
        edit(&self.registry, actor, portal, |p| {
            p.remove_required_item(index).ok_or_else(|| {
                ManagementError::InvalidInput(format!("Required item {} does not exist", index + 1))
            })
        })?
    }

    pub fn clear_required_items(
        &self,
        actor: &dyn ActorHandle,
        portal: &str,
    ) -> Result<(), ManagementError> {
        edit(&self.registry, actor, portal, |p| p.clear_required_items())
    }
}
