//! Movement use cases.

mod portal_trigger;

pub use portal_trigger::{PortalTrigger, TriggerOutcome};

use std::sync::Arc;

/// Container for movement use cases.
pub struct MovementUseCases {
    pub portal_trigger: Arc<PortalTrigger>,
}

impl MovementUseCases {
    pub fn new(portal_trigger: Arc<PortalTrigger>) -> Self {
        Self { portal_trigger }
    }
}
