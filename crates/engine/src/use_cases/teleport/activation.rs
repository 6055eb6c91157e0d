//! Activation requirements: permission, prior kit, required items.
//!
//! `check` is read-only and runs before anything is charged. `commit` runs
//! only after the actor has been moved; it consumes items and grants the
//! portal's kit.

use std::sync::Arc;

use portal2exit_domain::{ItemStack, Portal, RequiredItem};

use crate::infrastructure::app_settings::ActivationSettings;
use crate::infrastructure::ports::{ActorHandle, KitService};

/// Why an actor may not use a portal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActivationFailure {
    #[error("Missing permission: {permission}")]
    MissingPermission { permission: String },
    #[error("You must have received kit '{kit}' first")]
    MissingKit { kit: String },
    #[error("Missing items: {}", .0.join(", "))]
    MissingItems(Vec<String>),
}

/// Items were no longer available when the activation was committed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Items no longer available: {}", .missing.join(", "))]
pub struct CommitError {
    pub missing: Vec<String>,
}

/// What a successful commit did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationCommit {
    /// Items consumed, as `3x Torch`
    pub consumed: Vec<String>,
    /// Kit handed to the kit service, if any
    pub kit_granted: Option<String>,
}

struct ItemPlan {
    working: Vec<Option<ItemStack>>,
    consumed: Vec<String>,
    missing: Vec<String>,
}

pub struct ActivationGate {
    kits: Option<Arc<dyn KitService>>,
    settings: ActivationSettings,
    default_items: Vec<RequiredItem>,
}

impl ActivationGate {
    /// `kits` is `None` when no kit service is installed; kit requirements
    /// are then skipped.
    pub fn new(kits: Option<Arc<dyn KitService>>, settings: ActivationSettings) -> Self {
        let default_items = settings.default_required_items();
        Self {
            kits,
            settings,
            default_items,
        }
    }

    /// Read-only requirement check: permission, then prior kit, then items.
    pub fn check(&self, actor: &dyn ActorHandle, portal: &Portal) -> Result<(), ActivationFailure> {
        if self.settings.check_permission {
            if let Some(permission) = self.required_permission(portal) {
                if !actor.has_permission(permission) {
                    return Err(ActivationFailure::MissingPermission {
                        permission: permission.to_string(),
                    });
                }
            }
        }

        if self.settings.check_kit && self.settings.check_kit_received {
            if let (Some(kits), Some(kit)) = (&self.kits, portal.required_kit()) {
                if !kits.has_received(actor.id(), kit) {
                    return Err(ActivationFailure::MissingKit {
                        kit: kit.to_string(),
                    });
                }
            }
        }

        if self.settings.check_items {
            let plan = self.plan_items(portal, actor.inventory());
            if !plan.missing.is_empty() {
                return Err(ActivationFailure::MissingItems(plan.missing));
            }
        }

        Ok(())
    }

    /// Consume required items and grant the portal's kit.
    ///
    /// All consumable requirements are planned against one working copy of
    /// the inventory before any slot is written, so the actor either loses
    /// everything required or nothing. No kit is granted on failure.
    pub fn commit(
        &self,
        actor: &dyn ActorHandle,
        portal: &Portal,
    ) -> Result<ActivationCommit, CommitError> {
        let mut commit = ActivationCommit::default();

        if self.settings.check_items {
            commit.consumed = self.consume_items(actor, portal)?;
        }

        if let (Some(kits), Some(kit)) = (&self.kits, portal.effective_kit_to_give()) {
            if kits.apply(actor.id(), kit) {
                commit.kit_granted = Some(kit.to_string());
            } else {
                tracing::warn!(
                    actor = %actor.id(),
                    portal = %portal.name(),
                    kit,
                    "Kit service refused to grant portal kit"
                );
            }
        }

        Ok(commit)
    }

    fn consume_items(
        &self,
        actor: &dyn ActorHandle,
        portal: &Portal,
    ) -> Result<Vec<String>, CommitError> {
        let original = actor.inventory();
        let plan = self.plan_items(portal, original.clone());
        if !plan.missing.is_empty() {
            return Err(CommitError {
                missing: plan.missing,
            });
        }

        write_changed_slots(actor, &original, plan.working);
        Ok(plan.consumed)
    }

    /// Plan every requirement against one working inventory. Consumable
    /// items take their amounts first; kept items are counted against what
    /// is left. `check` and `commit` share this, so a passing check predicts
    /// a passing commit on an unchanged inventory.
    fn plan_items(&self, portal: &Portal, inventory: Vec<Option<ItemStack>>) -> ItemPlan {
        let required = self.required_items(portal);
        let mut working = inventory;
        let mut consumed = Vec::new();
        let mut short = vec![false; required.len()];

        for (index, item) in required.iter().enumerate().filter(|(_, i)| i.consume()) {
            match item.plan_consumption(&working) {
                Some(changes) => {
                    for change in &changes {
                        change.apply_to(&mut working);
                    }
                    consumed.push(item.describe());
                }
                None => short[index] = true,
            }
        }
        for (index, item) in required.iter().enumerate().filter(|(_, i)| !i.consume()) {
            short[index] = !item.is_satisfied_by(&working);
        }

        let missing = required
            .iter()
            .zip(&short)
            .filter(|(_, short)| **short)
            .map(|(item, _)| item.describe())
            .collect();
        ItemPlan {
            working,
            consumed,
            missing,
        }
    }

    fn required_permission<'a>(&'a self, portal: &'a Portal) -> Option<&'a str> {
        portal
            .required_permission()
            .or(self.settings.default_permission.as_deref())
    }

    fn required_items<'a>(&'a self, portal: &'a Portal) -> &'a [RequiredItem] {
        if portal.required_items().is_empty() {
            &self.default_items
        } else {
            portal.required_items()
        }
    }
}

fn write_changed_slots(
    actor: &dyn ActorHandle,
    original: &[Option<ItemStack>],
    working: Vec<Option<ItemStack>>,
) {
    for (slot, (before, after)) in original.iter().zip(working).enumerate() {
        if *before != after {
            actor.set_slot(slot, after);
        }
    }
}
