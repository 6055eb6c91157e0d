//! Teleport pipeline errors.

use super::activation::ActivationFailure;
use super::economy::EconomyFailure;

/// Pipeline step an attempt reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportStage {
    Idle,
    CheckingActivation,
    CheckingCooldown,
    ChargingEconomy,
    Resolving,
    Adjusting,
    Moving,
    CommittingActivation,
    SettingCooldown,
    Done,
}

/// Coarse classification of a failed teleport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportFailure {
    Validation,
    PermissionDenied,
    MissingRequirement,
    OnCooldown,
    InsufficientFunds,
    EconomyTransactionFailed,
    ResolutionFailed,
    MoveRejected,
}

/// Why a teleport attempt was aborted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TeleportError {
    #[error("Portal not found: {0}")]
    PortalNotFound(String),
    #[error("You don't have permission to use this portal ({permission})")]
    PermissionDenied { permission: String },
    #[error("You must have received kit '{kit}' to use this portal")]
    MissingKit { kit: String },
    #[error("You are missing required items: {}", .items.join(", "))]
    MissingItems { items: Vec<String> },
    #[error("Please wait {remaining_seconds} more second(s) before teleporting again")]
    OnCooldown { remaining_seconds: u64 },
    #[error("You need {cost} to use this portal (balance: {balance})")]
    InsufficientFunds { cost: String, balance: String },
    #[error("Payment failed: {0}")]
    EconomyTransactionFailed(String),
    #[error("No destination available: {0}")]
    ResolutionFailed(String),
    #[error("Teleport was rejected")]
    MoveRejected,
}

impl TeleportError {
    pub fn resolution_failed(reason: impl Into<String>) -> Self {
        Self::ResolutionFailed(reason.into())
    }

    /// Economy failures with amounts rendered in the currency format.
    pub(super) fn from_economy(failure: EconomyFailure, format: impl Fn(f64) -> String) -> Self {
        match failure {
            EconomyFailure::InsufficientFunds { cost, balance } => Self::InsufficientFunds {
                cost: format(cost),
                balance: format(balance),
            },
            EconomyFailure::Transaction(e) => Self::EconomyTransactionFailed(e.to_string()),
        }
    }

    pub fn reason(&self) -> TeleportFailure {
        match self {
            Self::PortalNotFound(_) => TeleportFailure::Validation,
            Self::PermissionDenied { .. } => TeleportFailure::PermissionDenied,
            Self::MissingKit { .. } | Self::MissingItems { .. } => {
                TeleportFailure::MissingRequirement
            }
            Self::OnCooldown { .. } => TeleportFailure::OnCooldown,
            Self::InsufficientFunds { .. } => TeleportFailure::InsufficientFunds,
            Self::EconomyTransactionFailed(_) => TeleportFailure::EconomyTransactionFailed,
            Self::ResolutionFailed(_) => TeleportFailure::ResolutionFailed,
            Self::MoveRejected => TeleportFailure::MoveRejected,
        }
    }

    /// The step at which the attempt stopped.
    pub fn stage(&self) -> TeleportStage {
        match self {
            Self::PortalNotFound(_) => TeleportStage::Idle,
            Self::PermissionDenied { .. } | Self::MissingKit { .. } | Self::MissingItems { .. } => {
                TeleportStage::CheckingActivation
            }
            Self::OnCooldown { .. } => TeleportStage::CheckingCooldown,
            Self::InsufficientFunds { .. } | Self::EconomyTransactionFailed(_) => {
                TeleportStage::ChargingEconomy
            }
            Self::ResolutionFailed(_) => TeleportStage::Resolving,
            Self::MoveRejected => TeleportStage::Moving,
        }
    }
}

impl From<ActivationFailure> for TeleportError {
    fn from(failure: ActivationFailure) -> Self {
        match failure {
            ActivationFailure::MissingPermission { permission } => {
                Self::PermissionDenied { permission }
            }
            ActivationFailure::MissingKit { kit } => Self::MissingKit { kit },
            ActivationFailure::MissingItems(items) => Self::MissingItems { items },
        }
    }
}
