//! Teleport use cases.
//!
//! The pipeline and the gates it runs through. Gates are shared with the
//! management use cases (economy) and the movement trigger.

pub mod activation;
pub mod economy;
pub mod error;
pub mod exit_resolver;
pub mod safety;
mod teleport_through_portal;

pub use activation::{ActivationCommit, ActivationFailure, ActivationGate, CommitError};
pub use economy::{Charge, EconomyFailure, EconomyGate};
pub use error::{TeleportError, TeleportFailure, TeleportStage};
pub use exit_resolver::{ExitResolution, ExitResolver};
pub use safety::SafetyLocator;
pub use teleport_through_portal::{TeleportOutcome, TeleportPolicy, TeleportThroughPortal};

use std::sync::Arc;

/// Container for teleport use cases.
pub struct TeleportUseCases {
    pub teleport: Arc<TeleportThroughPortal>,
}

impl TeleportUseCases {
    pub fn new(teleport: Arc<TeleportThroughPortal>) -> Self {
        Self { teleport }
    }
}
