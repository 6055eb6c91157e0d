//! Teleport through portal use case.
//!
//! Runs one attempt to completion in a fixed order: activation check,
//! cooldown check, economy charge, exit resolution, safety adjustment,
//! move, activation commit, cooldown stamp. Anything that fails before the
//! move aborts the attempt. A charge taken before a failed resolution or a
//! rejected move is not refunded.

use std::sync::Arc;

use portal2exit_domain::{Location, Portal};

use crate::infrastructure::app_settings::{EngineSettings, SafetySettings};
use crate::infrastructure::ports::{ActorHandle, WorldQuery};
use crate::stores::{lock, CooldownStore, PortalHandle, PortalRegistry};

use super::activation::{ActivationCommit, ActivationGate, CommitError};
use super::economy::{Charge, EconomyGate};
use super::error::TeleportError;
use super::exit_resolver::{ExitResolution, ExitResolver};
use super::safety::SafetyLocator;

/// Teleport settings that are not owned by a gate.
#[derive(Debug, Clone, Default)]
pub struct TeleportPolicy {
    pub safety: SafetySettings,
    /// Used when a custom or random portal has no exit at all
    pub fallback_exit: Option<Location>,
}

impl TeleportPolicy {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            safety: settings.safety.clone(),
            fallback_exit: settings.portals.fallback_exit.clone(),
        }
    }
}

/// A completed teleport.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportOutcome {
    pub portal: String,
    pub destination: Location,
    pub charge: Charge,
    /// Item consumption and kit grant; the move already happened either way
    pub activation: Result<ActivationCommit, CommitError>,
}

impl TeleportOutcome {
    pub fn committed(&self) -> bool {
        self.activation.is_ok()
    }
}

pub struct TeleportThroughPortal {
    registry: Arc<PortalRegistry>,
    world: Arc<dyn WorldQuery>,
    activation: Arc<ActivationGate>,
    cooldowns: Arc<CooldownStore>,
    economy: Arc<EconomyGate>,
    resolver: ExitResolver,
    safety: SafetyLocator,
    policy: TeleportPolicy,
}

impl TeleportThroughPortal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<PortalRegistry>,
        world: Arc<dyn WorldQuery>,
        activation: Arc<ActivationGate>,
        cooldowns: Arc<CooldownStore>,
        economy: Arc<EconomyGate>,
        resolver: ExitResolver,
        safety: SafetyLocator,
        policy: TeleportPolicy,
    ) -> Self {
        Self {
            registry,
            world,
            activation,
            cooldowns,
            economy,
            resolver,
            safety,
            policy,
        }
    }

    /// Teleport `actor` through the portal named `portal_name`.
    pub fn execute(
        &self,
        actor: &dyn ActorHandle,
        portal_name: &str,
    ) -> Result<TeleportOutcome, TeleportError> {
        let handle = self
            .registry
            .get(portal_name)
            .ok_or_else(|| TeleportError::PortalNotFound(portal_name.to_string()))?;
        self.execute_handle(actor, &handle)
    }

    /// Teleport `actor` through an already looked-up portal.
    ///
    /// The portal lock is held only while the exit is resolved, never while
    /// the actor is moved.
    pub fn execute_handle(
        &self,
        actor: &dyn ActorHandle,
        handle: &PortalHandle,
    ) -> Result<TeleportOutcome, TeleportError> {
        let portal = lock(handle).clone();
        let result = self.run(actor, handle, &portal);
        if let Err(e) = &result {
            tracing::debug!(
                actor = %actor.id(),
                portal = %portal.name(),
                stage = ?e.stage(),
                reason = ?e.reason(),
                "Teleport aborted: {e}"
            );
        }
        result
    }

    fn run(
        &self,
        actor: &dyn ActorHandle,
        handle: &PortalHandle,
        portal: &Portal,
    ) -> Result<TeleportOutcome, TeleportError> {
        let actor_id = actor.id();

        self.activation.check(actor, portal)?;

        if self.cooldowns.is_on_cooldown(actor_id) {
            return Err(TeleportError::OnCooldown {
                remaining_seconds: self.cooldowns.remaining_seconds(actor_id),
            });
        }

        let charge = self
            .economy
            .charge(actor, portal)
            .map_err(|e| TeleportError::from_economy(e, |amount| self.economy.format(amount)))?;

        let destination = match self.destination(actor, handle, portal) {
            Ok(destination) => destination,
            Err(e) => {
                warn_unrefunded(actor, portal, &charge, &e);
                return Err(e);
            }
        };
        let destination = self.safety.ensure_safe(destination, &self.policy.safety);

        if !actor.teleport(&destination) {
            let e = TeleportError::MoveRejected;
            warn_unrefunded(actor, portal, &charge, &e);
            return Err(e);
        }

        let activation = self.activation.commit(actor, portal);
        if let Err(e) = &activation {
            tracing::warn!(
                actor = %actor_id,
                portal = %portal.name(),
                error = %e,
                "Activation commit failed after teleport"
            );
        }

        self.cooldowns.set(actor_id);

        tracing::info!(
            actor = %actor_id,
            portal = %portal.name(),
            destination = %destination,
            charged = charge.amount(),
            "Teleported through portal"
        );

        Ok(TeleportOutcome {
            portal: portal.name().to_string(),
            destination,
            charge,
            activation,
        })
    }

    fn destination(
        &self,
        actor: &dyn ActorHandle,
        handle: &PortalHandle,
        portal: &Portal,
    ) -> Result<Location, TeleportError> {
        let Some(traveler) = actor.location() else {
            tracing::warn!(actor = %actor.id(), "Actor has no location");
            return Err(TeleportError::resolution_failed("you are not in a world"));
        };

        // Resolve against the live portal so the sequential cursor advances.
        let resolved = {
            let mut live = lock(handle);
            self.resolver.resolve(&mut live, &traveler)
        };

        match resolved {
            Some(ExitResolution::Point(exit)) => Ok(exit),
            Some(ExitResolution::WorldSpawn) => self.world_spawn(&traveler),
            Some(ExitResolution::BedOrSpawn) => match actor.bed_location() {
                Some(bed) => Ok(bed),
                None => self.world_spawn(&traveler),
            },
            None => self.policy.fallback_exit.clone().ok_or_else(|| {
                TeleportError::resolution_failed(format!(
                    "portal '{}' has no exit points",
                    portal.name()
                ))
            }),
        }
    }

    fn world_spawn(&self, traveler: &Location) -> Result<Location, TeleportError> {
        self.world.spawn_point(&traveler.world).ok_or_else(|| {
            tracing::warn!(world = %traveler.world, "World has no spawn point");
            TeleportError::resolution_failed(format!("world '{}' has no spawn", traveler.world))
        })
    }
}

fn warn_unrefunded(
    actor: &dyn ActorHandle,
    portal: &Portal,
    charge: &Charge,
    error: &TeleportError,
) {
    if let Charge::Paid { amount, .. } = charge {
        tracing::warn!(
            actor = %actor.id(),
            portal = %portal.name(),
            amount,
            error = %error,
            "Teleport failed after payment; charge was not refunded"
        );
    }
}
