//! Portal management use cases.
//!
//! Creation, removal and editing of portals. Every edit requires the actor
//! to own the portal or hold the admin permission.

mod configure;
mod exits;
mod lifecycle;
mod queries;

pub use configure::PortalConfig;
pub use exits::{ExitPoints, RemovedExit};
pub use lifecycle::{ClearPortals, CreatePortal, CreatedPortal, RemovePortal, RemovedPortal};
pub use queries::PortalQueries;

use std::sync::Arc;

use portal2exit_domain::{DomainError, Portal};

use crate::infrastructure::ports::ActorHandle;
use crate::stores::{lock, PortalRegistry};
use crate::use_cases::permissions;
use crate::use_cases::teleport::{EconomyFailure, EconomyGate};

/// Shared error type for management use cases.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManagementError {
    #[error("Portal not found: {0}")]
    NotFound(String),
    #[error("A portal named '{0}' already exists")]
    Duplicate(String),
    #[error("You don't have permission to {0}")]
    PermissionDenied(&'static str),
    #[error("You have reached the maximum of {max} portals")]
    LimitReached { max: u32 },
    #[error("Creating a portal costs {cost} (balance: {balance})")]
    InsufficientFunds { cost: String, balance: String },
    #[error("Payment failed: {0}")]
    EconomyTransactionFailed(String),
    #[error("No exit point within {radius} blocks")]
    NoExitNearby { radius: f64 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ManagementError {
    fn from_economy(failure: EconomyFailure, economy: &EconomyGate) -> Self {
        match failure {
            EconomyFailure::InsufficientFunds { cost, balance } => Self::InsufficientFunds {
                cost: economy.format(cost),
                balance: economy.format(balance),
            },
            EconomyFailure::Transaction(e) => Self::EconomyTransactionFailed(e.to_string()),
        }
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub create: Arc<CreatePortal>,
    pub remove: Arc<RemovePortal>,
    pub clear: Arc<ClearPortals>,
    pub exits: Arc<ExitPoints>,
    pub config: Arc<PortalConfig>,
    pub queries: Arc<PortalQueries>,
}

impl ManagementUseCases {
    pub fn new(
        create: Arc<CreatePortal>,
        remove: Arc<RemovePortal>,
        clear: Arc<ClearPortals>,
        exits: Arc<ExitPoints>,
        config: Arc<PortalConfig>,
        queries: Arc<PortalQueries>,
    ) -> Self {
        Self {
            create,
            remove,
            clear,
            exits,
            config,
            queries,
        }
    }
}

/// Owners and admins may edit a portal.
pub fn can_edit(actor: &dyn ActorHandle, portal: &Portal) -> bool {
    portal.is_owned_by(actor.id()) || actor.has_permission(permissions::ADMIN)
}

/// Run `f` on a portal the actor may edit, under the portal's lock.
fn edit<R>(
    registry: &PortalRegistry,
    actor: &dyn ActorHandle,
    name: &str,
    f: impl FnOnce(&mut Portal) -> R,
) -> Result<R, ManagementError> {
    let handle = registry
        .get(name)
        .ok_or_else(|| ManagementError::NotFound(name.to_string()))?;
    let mut portal = lock(&handle);
    if !can_edit(actor, &portal) {
        return Err(ManagementError::PermissionDenied("edit this portal"));
    }
    Ok(f(&mut portal))
}
