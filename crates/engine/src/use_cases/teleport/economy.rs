//! Portal usage charges, creation charges and refunds.

use std::sync::Arc;

use portal2exit_domain::{ActorId, Portal};

use crate::infrastructure::app_settings::EconomySettings;
use crate::infrastructure::ports::{ActorHandle, EconomyError, EconomyService};
use crate::use_cases::permissions;

/// What the gate did to the actor's balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Charge {
    /// Economy off or nothing to pay
    Free,
    /// Actor holds the cost bypass permission
    Bypassed,
    /// Amount withdrawn and the part of it forwarded to the owner
    Paid { amount: f64, owner_share: f64 },
}

impl Charge {
    pub fn amount(&self) -> f64 {
        match self {
            Charge::Paid { amount, .. } => *amount,
            Charge::Free | Charge::Bypassed => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconomyFailure {
    #[error("Insufficient funds: {cost:.2} required, {balance:.2} available")]
    InsufficientFunds { cost: f64, balance: f64 },
    #[error("Transaction failed: {0}")]
    Transaction(#[from] EconomyError),
}

pub struct EconomyGate {
    economy: Option<Arc<dyn EconomyService>>,
    settings: EconomySettings,
}

impl EconomyGate {
    /// With no economy service installed every charge is free.
    pub fn new(economy: Option<Arc<dyn EconomyService>>, settings: EconomySettings) -> Self {
        Self { economy, settings }
    }

    /// Service to charge through, if charging is on at all.
    fn active(&self) -> Option<&dyn EconomyService> {
        if !self.settings.enabled {
            return None;
        }
        self.economy.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.active().is_some()
    }

    /// Usage cost: the portal's own price, or the default when it has none.
    pub fn cost_for(&self, portal: &Portal) -> f64 {
        if portal.cost() > 0.0 {
            portal.cost()
        } else {
            self.settings.default_cost
        }
    }

    /// Charge an actor for using `portal`.
    ///
    /// Balances are untouched on failure. The owner's share is paid best
    /// effort; a failed deposit does not undo the withdrawal.
    pub fn charge(
        &self,
        actor: &dyn ActorHandle,
        portal: &Portal,
    ) -> Result<Charge, EconomyFailure> {
        let Some(economy) = self.active() else {
            return Ok(Charge::Free);
        };
        let cost = self.cost_for(portal);
        if cost <= 0.0 {
            return Ok(Charge::Free);
        }
        if actor.has_permission(permissions::BYPASS_COST) {
            return Ok(Charge::Bypassed);
        }

        withdraw(economy, actor.id(), cost)?;

        let mut owner_share = 0.0;
        let owner = portal.owner();
        if self.settings.owner_share > 0.0 && owner != actor.id() {
            let share = cost * self.settings.owner_share;
            match economy.deposit(owner, share) {
                Ok(()) => owner_share = share,
                Err(e) => tracing::warn!(
                    error = %e,
                    owner = %owner,
                    portal = %portal.name(),
                    amount = share,
                    "Failed to pay portal owner their share"
                ),
            }
        }

        Ok(Charge::Paid {
            amount: cost,
            owner_share,
        })
    }

    /// Price of the next portal for someone who already owns `owned`.
    pub fn creation_cost(&self, owned: usize) -> f64 {
        let base = self.settings.creation_cost;
        if self.settings.creation_scaling <= 0.0 {
            return base;
        }
        base * (1.0 + owned as f64 * self.settings.creation_scaling)
    }

    /// Charge a flat amount, used for portal creation.
    pub fn charge_amount(&self, actor: ActorId, amount: f64) -> Result<Charge, EconomyFailure> {
        let Some(economy) = self.active() else {
            return Ok(Charge::Free);
        };
        if amount <= 0.0 {
            return Ok(Charge::Free);
        }
        withdraw(economy, actor, amount)?;
        Ok(Charge::Paid {
            amount,
            owner_share: 0.0,
        })
    }

    /// Refund part of a portal's creation cost to `owner`.
    ///
    /// Returns the amount actually refunded.
    pub fn refund_creation(&self, owner: ActorId, portal: &Portal) -> f64 {
        let refund = portal.creation_cost() * self.settings.refund_percentage / 100.0;
        self.refund(owner, refund)
    }

    /// Best-effort deposit; returns what was paid out.
    pub fn refund(&self, actor: ActorId, amount: f64) -> f64 {
        let Some(economy) = self.active() else {
            return 0.0;
        };
        if amount <= 0.0 {
            return 0.0;
        }
        match economy.deposit(actor, amount) {
            Ok(()) => amount,
            Err(e) => {
                tracing::warn!(error = %e, actor = %actor, amount, "Refund failed");
                0.0
            }
        }
    }

    /// Render an amount with the service's currency format.
    pub fn format(&self, amount: f64) -> String {
        match self.economy.as_deref() {
            Some(economy) => economy.format(amount),
            None => format!("{amount:.2}"),
        }
    }
}

fn withdraw(
    economy: &dyn EconomyService,
    actor: ActorId,
    amount: f64,
) -> Result<(), EconomyFailure> {
    let balance = economy.balance(actor);
    if balance < amount {
        return Err(EconomyFailure::InsufficientFunds {
            cost: amount,
            balance,
        });
    }
    economy.withdraw(actor, amount)?;
    Ok(())
}
