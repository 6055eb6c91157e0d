//! Inventory stacks and portal item requirements
//!
//! Inventories are modelled as slot lists (`[Option<ItemStack>]`) so that
//! consumption can be expressed as per-slot changes and applied back to the
//! host inventory slot by slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::material::Material;
use super::quantity::StackChange;
use crate::error::DomainError;

/// A stack of items held in one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u32,
    pub display_name: Option<String>,
    pub lore: Vec<String>,
}

impl ItemStack {
    pub fn new(material: Material, amount: u32) -> Self {
        Self {
            material,
            amount,
            display_name: None,
            lore: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, lore: Vec<String>) -> Self {
        self.lore = lore;
        self
    }
}

/// A planned change to one inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChange {
    pub slot: usize,
    pub change: StackChange,
}

impl SlotChange {
    /// Apply this change to an inventory slot list. Out-of-range slots are ignored.
    pub fn apply_to(&self, inventory: &mut [Option<ItemStack>]) {
        let Some(slot) = inventory.get_mut(self.slot) else {
            return;
        };
        match self.change {
            StackChange::Emptied => *slot = None,
            StackChange::Reduced(remaining) => {
                if let Some(stack) = slot.as_mut() {
                    stack.amount = remaining;
                }
            }
        }
    }
}

/// An item the actor must carry to activate a portal.
///
/// # Invariants
///
/// - `amount` is always greater than zero
/// - An empty `lore` means "any lore"; a `None` display name means "any name"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredItem {
    material: Material,
    amount: u32,
    consume: bool,
    display_name: Option<String>,
    lore: Vec<String>,
}

impl RequiredItem {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `amount` is zero.
    pub fn new(material: Material, amount: u32, consume: bool) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation(
                "Required item amount must be greater than zero",
            ));
        }
        Ok(Self {
            material,
            amount,
            consume,
            display_name: None,
            lore: Vec::new(),
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, lore: Vec<String>) -> Self {
        self.lore = lore;
        self
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    #[inline]
    pub fn consume(&self) -> bool {
        self.consume
    }

    #[inline]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[inline]
    pub fn lore(&self) -> &[String] {
        &self.lore
    }

    /// Exact match: same material, and the same display name / lore when
    /// those are specified on the requirement.
    pub fn matches(&self, stack: &ItemStack) -> bool {
        if stack.material != self.material {
            return false;
        }
        if let Some(name) = &self.display_name {
            if stack.display_name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if !self.lore.is_empty() && stack.lore != self.lore {
            return false;
        }
        true
    }

    /// Total matching items across the whole inventory.
    pub fn count_in(&self, inventory: &[Option<ItemStack>]) -> u32 {
        inventory
            .iter()
            .flatten()
            .filter(|stack| self.matches(stack))
            .fold(0u32, |sum, stack| sum.saturating_add(stack.amount))
    }

    pub fn is_satisfied_by(&self, inventory: &[Option<ItemStack>]) -> bool {
        self.count_in(inventory) >= self.amount
    }

    /// Plan removal of exactly `amount` matching items, taking from slots in
    /// order. Returns `None` without planning anything if the inventory does
    /// not hold enough.
    pub fn plan_consumption(&self, inventory: &[Option<ItemStack>]) -> Option<Vec<SlotChange>> {
        if !self.is_satisfied_by(inventory) {
            return None;
        }
        let mut outstanding = self.amount;
        let mut changes = Vec::new();
        for (slot, stack) in inventory.iter().enumerate() {
            if outstanding == 0 {
                break;
            }
            let Some(stack) = stack.as_ref().filter(|s| self.matches(s)) else {
                continue;
            };
            let taken = outstanding.min(stack.amount);
            changes.push(SlotChange {
                slot,
                change: StackChange::take(stack.amount, taken),
            });
            outstanding -= taken;
        }
        Some(changes)
    }

    /// Short human description, e.g. `3x Torch`.
    pub fn describe(&self) -> String {
        let name = self
            .display_name
            .clone()
            .unwrap_or_else(|| self.material.display_name());
        format!("{}x {}", self.amount, name)
    }
}

impl fmt::Display for RequiredItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.amount, self.material)?;
        if self.consume {
            write!(f, " (consumed)")?;
        }
        Ok(())
    }
}
