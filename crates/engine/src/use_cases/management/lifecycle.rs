//! Portal creation and removal.

use std::sync::Arc;

use portal2exit_domain::{DomainError, Location, Portal, PortalName};

use crate::infrastructure::app_settings::PortalSettings;
use crate::infrastructure::ports::{ActorHandle, ClockPort};
use crate::stores::{lock, PortalRegistry};
use crate::use_cases::permissions;
use crate::use_cases::teleport::{Charge, EconomyGate};

use super::{can_edit, ManagementError};

/// A newly registered portal and what its owner paid.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPortal {
    pub portal: Portal,
    pub charge: Charge,
}

/// Create portal use case.
///
/// Orchestrates: permission, name validation, duplicate check, per-owner
/// limit, creation charge, registration.
pub struct CreatePortal {
    registry: Arc<PortalRegistry>,
    economy: Arc<EconomyGate>,
    clock: Arc<dyn ClockPort>,
    settings: PortalSettings,
}

impl CreatePortal {
    pub fn new(
        registry: Arc<PortalRegistry>,
        economy: Arc<EconomyGate>,
        clock: Arc<dyn ClockPort>,
        settings: PortalSettings,
    ) -> Self {
        Self {
            registry,
            economy,
            clock,
            settings,
        }
    }

    /// Create a portal named `name` at `location`, owned by `actor`.
    ///
    /// Nothing is charged unless every check passes.
    pub fn execute(
        &self,
        actor: &dyn ActorHandle,
        name: &str,
        location: Location,
    ) -> Result<CreatedPortal, ManagementError> {
        if !actor.has_permission(permissions::CREATE) && !actor.has_permission(permissions::ADMIN) {
            return Err(ManagementError::PermissionDenied("create portals"));
        }

        let name = PortalName::new(name)
            .map_err(|e| ManagementError::InvalidInput(format!("Invalid portal name: {}", e)))?;
        if self.registry.contains(name.as_str()) {
            return Err(ManagementError::Duplicate(name.to_string()));
        }

        let owner = actor.id();
        let owned = self.registry.count_owned_by(owner);
        let max = self.settings.max_per_player;
        if max > 0 && owned >= max as usize && !actor.has_permission(permissions::UNLIMITED) {
            return Err(ManagementError::LimitReached { max });
        }

        let cost = self.economy.creation_cost(owned);
        let charge = self
            .economy
            .charge_amount(owner, cost)
            .map_err(|e| ManagementError::from_economy(e, &self.economy))?;

        let portal = Portal::new(name, location, owner, self.clock.now())
            .with_creation_cost(charge.amount());

        match self.registry.insert(portal.clone()) {
            Ok(_) => {}
            Err(DomainError::Duplicate { id, .. }) => {
                // Lost a race with another creation of the same name.
                self.economy.refund(owner, charge.amount());
                return Err(ManagementError::Duplicate(id));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            portal = %portal.name(),
            owner = %owner,
            location = %portal.location(),
            paid = charge.amount(),
            "Portal created"
        );
        Ok(CreatedPortal { portal, charge })
    }

    /// First free `<owner>_portal_<n>` name, counting from 1.
    pub fn generate_name(&self, owner_name: &str) -> String {
        (1..)
            .map(|n| format!("{}_portal_{}", owner_name, n))
            .find(|candidate| !self.registry.contains(candidate))
            .unwrap_or_else(|| format!("{}_portal", owner_name))
    }
}

/// A removed portal and the creation refund paid to its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedPortal {
    pub portal: Portal,
    pub refund: f64,
}

/// Remove portal use case. Owners and admins only.
pub struct RemovePortal {
    registry: Arc<PortalRegistry>,
    economy: Arc<EconomyGate>,
}

impl RemovePortal {
    pub fn new(registry: Arc<PortalRegistry>, economy: Arc<EconomyGate>) -> Self {
        Self { registry, economy }
    }

    pub fn execute(
        &self,
        actor: &dyn ActorHandle,
        name: &str,
    ) -> Result<RemovedPortal, ManagementError> {
        let handle = self
            .registry
            .get(name)
            .ok_or_else(|| ManagementError::NotFound(name.to_string()))?;
        if !can_edit(actor, &lock(&handle)) {
            return Err(ManagementError::PermissionDenied("remove this portal"));
        }

        let portal = self
            .registry
            .remove(name)
            .ok_or_else(|| ManagementError::NotFound(name.to_string()))?;
        let refund = self.economy.refund_creation(portal.owner(), &portal);

        tracing::info!(
            portal = %portal.name(),
            removed_by = %actor.id(),
            refund,
            "Portal removed"
        );
        Ok(RemovedPortal { portal, refund })
    }
}

/// Remove every portal. Admins only; no refunds.
pub struct ClearPortals {
    registry: Arc<PortalRegistry>,
}

impl ClearPortals {
    pub fn new(registry: Arc<PortalRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(&self, actor: &dyn ActorHandle) -> Result<usize, ManagementError> {
        if !actor.has_permission(permissions::ADMIN) {
            return Err(ManagementError::PermissionDenied("clear all portals"));
        }
        let removed = self.registry.clear();
        tracing::warn!(removed, cleared_by = %actor.id(), "All portals cleared");
        Ok(removed)
    }
}
