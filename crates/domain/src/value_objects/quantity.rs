//! Quantity changes applied to inventory stacks

use serde::{Deserialize, Serialize};

/// Result of taking items out of a single stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackChange {
    /// Stack keeps this many items
    Reduced(u32),
    /// Stack is used up and the slot becomes empty
    Emptied,
}

impl StackChange {
    /// Take `amount` from a stack currently holding `current` items
    pub fn take(current: u32, amount: u32) -> Self {
        if amount >= current {
            Self::Emptied
        } else {
            Self::Reduced(current - amount)
        }
    }

    /// Check if the slot should be cleared
    pub fn empties_slot(&self) -> bool {
        matches!(self, Self::Emptied)
    }

    /// Get the remaining amount, if the stack survives
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Reduced(qty) => Some(*qty),
            Self::Emptied => None,
        }
    }
}
