//! External service ports (economy provider, kit plugin).

use portal2exit_domain::ActorId;

use super::error::EconomyError;

#[cfg_attr(test, mockall::automock)]
pub trait EconomyService: Send + Sync {
    fn balance(&self, actor: ActorId) -> f64;

    fn withdraw(&self, actor: ActorId, amount: f64) -> Result<(), EconomyError>;

    fn deposit(&self, actor: ActorId, amount: f64) -> Result<(), EconomyError>;

    /// Render an amount in the provider's currency format.
    fn format(&self, amount: f64) -> String;
}

/// Kit plugin bridge. The kit plugin applies its own cooldown, permission
/// and cost rules.
#[cfg_attr(test, mockall::automock)]
pub trait KitService: Send + Sync {
    fn has_received(&self, actor: ActorId, kit: &str) -> bool;

    fn apply(&self, actor: ActorId, kit: &str) -> bool;
}
