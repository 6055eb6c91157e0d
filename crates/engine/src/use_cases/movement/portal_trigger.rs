//! Portal trigger use case.
//!
//! Turns actor movement into teleport attempts. Moves within one block are
//! ignored and each actor is checked at most once per throttle window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use portal2exit_domain::{ActorId, Location};

use crate::infrastructure::app_settings::TriggerSettings;
use crate::infrastructure::ports::{ActorHandle, ClockPort};
use crate::stores::{lock, PortalRegistry};
use crate::use_cases::permissions;
use crate::use_cases::teleport::{TeleportError, TeleportOutcome, TeleportThroughPortal};

/// What a move led to.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// Same block as before
    Ignored,
    /// Checked too recently
    Throttled,
    /// Actor lacks the use permission
    NotPermitted,
    NoPortal,
    /// A portal is close but not close enough to enter
    Approaching { portal: String, distance: f64 },
    Teleported(TeleportOutcome),
    Failed { portal: String, error: TeleportError },
}

pub struct PortalTrigger {
    registry: Arc<PortalRegistry>,
    teleport: Arc<TeleportThroughPortal>,
    clock: Arc<dyn ClockPort>,
    settings: TriggerSettings,
    last_check: DashMap<ActorId, DateTime<Utc>>,
}

impl PortalTrigger {
    pub fn new(
        registry: Arc<PortalRegistry>,
        teleport: Arc<TeleportThroughPortal>,
        clock: Arc<dyn ClockPort>,
        settings: TriggerSettings,
    ) -> Self {
        Self {
            registry,
            teleport,
            clock,
            settings,
            last_check: DashMap::new(),
        }
    }

    pub fn on_move(
        &self,
        actor: &dyn ActorHandle,
        from: &Location,
        to: &Location,
    ) -> TriggerOutcome {
        if from.same_world(to) && from.block() == to.block() {
            return TriggerOutcome::Ignored;
        }
        if self.throttled(actor.id()) {
            return TriggerOutcome::Throttled;
        }
        if !actor.has_permission(permissions::USE) {
            return TriggerOutcome::NotPermitted;
        }

        let Some(nearby) = self.registry.find_near(to, self.settings.detection_radius) else {
            return TriggerOutcome::NoPortal;
        };
        let portal = lock(&nearby.handle).name().to_string();
        if nearby.distance > self.settings.trigger_radius {
            return TriggerOutcome::Approaching {
                portal,
                distance: nearby.distance,
            };
        }

        match self.teleport.execute_handle(actor, &nearby.handle) {
            Ok(outcome) => TriggerOutcome::Teleported(outcome),
            Err(error) => TriggerOutcome::Failed { portal, error },
        }
    }

    /// Drop throttle state for an actor that left.
    pub fn forget(&self, actor: ActorId) {
        self.last_check.remove(&actor);
    }

    /// Records the check time unless the actor is still inside the window.
    fn throttled(&self, actor: ActorId) -> bool {
        let now = self.clock.now();
        let window = chrono::Duration::milliseconds(
            i64::try_from(self.settings.throttle_millis).unwrap_or(i64::MAX),
        );
        match self.last_check.entry(actor) {
            Entry::Occupied(mut last) => {
                if now - *last.get() < window {
                    return true;
                }
                last.insert(now);
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::app_settings::{ActivationSettings, EconomySettings};
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::MockClockPort;
    use crate::stores::CooldownStore;
    use crate::test_fixtures::{portals, FakeActor, GridWorld};
    use crate::use_cases::teleport::{
        ActivationGate, EconomyGate, ExitResolver, SafetyLocator, TeleportFailure, TeleportPolicy,
    };
    use chrono::TimeZone;
    use portal2exit_domain::{ActorId, ExitType};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StepClock(Mutex<DateTime<Utc>>);

    impl StepClock {
        fn advance_millis(&self, millis: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::milliseconds(millis);
        }
    }

    impl ClockPort for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn trigger_with(clock: Arc<dyn ClockPort>) -> (PortalTrigger, Arc<PortalRegistry>) {
        let registry = Arc::new(PortalRegistry::new());
        let world = Arc::new(GridWorld::flat(63));
        let teleport = TeleportThroughPortal::new(
            registry.clone(),
            world.clone(),
            Arc::new(ActivationGate::new(None, ActivationSettings::default())),
            Arc::new(CooldownStore::new(
                Duration::from_secs(3),
                Arc::new(FixedClock(start())),
            )),
            Arc::new(EconomyGate::new(None, EconomySettings::default())),
            ExitResolver::new(Arc::new(FixedRandom(0))),
            SafetyLocator::new(world),
            TeleportPolicy::default(),
        );
        let trigger = PortalTrigger::new(
            registry.clone(),
            Arc::new(teleport),
            clock,
            TriggerSettings::default(),
        );
        (trigger, registry)
    }

    fn gate_portal(registry: &PortalRegistry) {
        let portal = portals::portal_at(
            "Gate",
            ActorId::new(),
            portals::at("world", 0.5, 64.0, 0.5),
        )
            .with_exit_type(ExitType::Custom)
            .with_exit_points([portals::at("world", 40.5, 64.0, 0.5)]);
        registry.insert(portal).unwrap();
    }

    fn walker() -> FakeActor {
        FakeActor::new("Walker")
            .with_permission(permissions::USE)
            .at(portals::at("world", 0.9, 64.0, 0.5))
    }

    #[test]
    fn stepping_into_portal_teleports() {
        let (trigger, registry) = trigger_with(Arc::new(FixedClock(start())));
        gate_portal(&registry);
        let actor = walker();

        let outcome = trigger.on_move(
            &actor,
            &portals::at("world", 1.9, 64.0, 0.5),
            &portals::at("world", 0.9, 64.0, 0.5),
        );

        match outcome {
            TriggerOutcome::Teleported(result) => {
                assert_eq!(result.destination, portals::at("world", 40.5, 64.0, 0.5));
            }
            other => panic!("expected teleport, got {other:?}"),
        }
        assert_eq!(actor.moves().len(), 1);
    }

    #[test]
    fn moves_within_a_block_are_ignored() {
        let mut clock = MockClockPort::new();
        clock.expect_now().times(0);
        let (trigger, registry) = trigger_with(Arc::new(clock));
        gate_portal(&registry);

        let outcome = trigger.on_move(
            &walker(),
            &portals::at("world", 0.2, 64.0, 0.2),
            &portals::at("world", 0.8, 64.3, 0.7),
        );
        assert_eq!(outcome, TriggerOutcome::Ignored);
    }

    #[test]
    fn approaching_portal_does_not_teleport() {
        let (trigger, registry) = trigger_with(Arc::new(FixedClock(start())));
        gate_portal(&registry);
        let actor = walker();

        let outcome = trigger.on_move(
            &actor,
            &portals::at("world", 4.5, 64.0, 0.5),
            &portals::at("world", 3.5, 64.0, 0.5),
        );

        assert_eq!(
            outcome,
            TriggerOutcome::Approaching {
                portal: "Gate".into(),
                distance: 3.0
            }
        );
        assert!(actor.moves().is_empty());
    }

    #[test]
    fn no_portal_nearby() {
        let (trigger, registry) = trigger_with(Arc::new(FixedClock(start())));
        gate_portal(&registry);
        let outcome = trigger.on_move(
            &walker(),
            &portals::at("world", 20.5, 64.0, 0.5),
            &portals::at("world", 21.5, 64.0, 0.5),
        );
        assert_eq!(outcome, TriggerOutcome::NoPortal);
    }

    #[test]
    fn actor_without_use_permission_is_skipped() {
        let (trigger, registry) = trigger_with(Arc::new(FixedClock(start())));
        gate_portal(&registry);
        let outcome = trigger.on_move(
            &FakeActor::new("Guest"),
            &portals::at("world", 1.9, 64.0, 0.5),
            &portals::at("world", 0.9, 64.0, 0.5),
        );
        assert_eq!(outcome, TriggerOutcome::NotPermitted);
    }

    #[test]
    fn checks_are_throttled_per_actor() {
        let clock = Arc::new(StepClock(Mutex::new(start())));
        let (trigger, _) = trigger_with(clock.clone());
        let actor = walker();
        let other = walker();
        let a = portals::at("world", 10.5, 64.0, 0.5);
        let b = portals::at("world", 11.5, 64.0, 0.5);

        assert_eq!(trigger.on_move(&actor, &a, &b), TriggerOutcome::NoPortal);
        clock.advance_millis(100);
        assert_eq!(trigger.on_move(&actor, &b, &a), TriggerOutcome::Throttled);
        assert_eq!(trigger.on_move(&other, &b, &a), TriggerOutcome::NoPortal);
        clock.advance_millis(150);
        assert_eq!(trigger.on_move(&actor, &a, &b), TriggerOutcome::NoPortal);

        trigger.forget(actor.id());
        assert_eq!(trigger.on_move(&actor, &b, &a), TriggerOutcome::NoPortal);
    }

    #[test]
    fn failed_teleport_is_reported() {
        let (trigger, registry) = trigger_with(Arc::new(FixedClock(start())));
        let portal = portals::portal_at(
            "Void",
            ActorId::new(),
            portals::at("world", 0.5, 64.0, 0.5),
        )
            .with_exit_type(ExitType::Custom);
        registry.insert(portal).unwrap();

        let outcome = trigger.on_move(
            &walker(),
            &portals::at("world", 1.9, 64.0, 0.5),
            &portals::at("world", 0.9, 64.0, 0.5),
        );

        match outcome {
            TriggerOutcome::Failed { portal, error } => {
                assert_eq!(portal, "Void");
                assert_eq!(error.reason(), TeleportFailure::ResolutionFailed);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
