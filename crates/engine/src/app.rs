//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    app_settings::EngineSettings,
    autosave::PortalAutosave,
    clock::{SystemClock, SystemRandom},
    ports::{ClockPort, EconomyService, KitService, PortalStore, RandomPort, StoreError, WorldQuery},
};
use crate::stores::{CooldownStore, PortalRegistry};
use crate::use_cases;
use crate::use_cases::management::{
    ClearPortals, CreatePortal, ExitPoints, PortalConfig, PortalQueries, RemovePortal,
};
use crate::use_cases::movement::PortalTrigger;
use crate::use_cases::teleport::{
    ActivationGate, EconomyGate, ExitResolver, SafetyLocator, TeleportPolicy,
    TeleportThroughPortal,
};

/// Capabilities supplied by the host server bridge.
pub struct HostPorts {
    pub world: Arc<dyn WorldQuery>,
    /// `None` when no economy plugin is installed
    pub economy: Option<Arc<dyn EconomyService>>,
    /// `None` when no kit plugin is installed
    pub kits: Option<Arc<dyn KitService>>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

impl HostPorts {
    /// Host ports with the system clock and random source.
    pub fn new(world: Arc<dyn WorldQuery>) -> Self {
        Self {
            world,
            economy: None,
            kits: None,
            clock: Arc::new(SystemClock::new()),
            random: Arc::new(SystemRandom::new()),
        }
    }

    pub fn with_economy(mut self, economy: Arc<dyn EconomyService>) -> Self {
        self.economy = Some(economy);
        self
    }

    pub fn with_kits(mut self, kits: Arc<dyn KitService>) -> Self {
        self.kits = Some(kits);
        self
    }
}

/// Main application state.
///
/// Holds the shared stores and every use case. A host bridge builds one at
/// startup and routes commands and move events into `use_cases`.
pub struct App {
    pub registry: Arc<PortalRegistry>,
    pub cooldowns: Arc<CooldownStore>,
    pub store: Arc<dyn PortalStore>,
    pub settings: EngineSettings,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub teleport: use_cases::TeleportUseCases,
    pub management: use_cases::ManagementUseCases,
    pub movement: use_cases::MovementUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(settings: EngineSettings, host: HostPorts, store: Arc<dyn PortalStore>) -> Self {
        let registry = Arc::new(PortalRegistry::new());
        let cooldowns = Arc::new(CooldownStore::new(
            settings.cooldown_duration(),
            host.clock.clone(),
        ));

        // Gates shared by the teleport pipeline and management
        let economy = Arc::new(EconomyGate::new(host.economy, settings.economy.clone()));
        let activation = Arc::new(ActivationGate::new(host.kits, settings.activation.clone()));

        let teleport = Arc::new(TeleportThroughPortal::new(
            registry.clone(),
            host.world.clone(),
            activation,
            cooldowns.clone(),
            economy.clone(),
            ExitResolver::new(host.random),
            SafetyLocator::new(host.world),
            TeleportPolicy::from_settings(&settings),
        ));

        let management = use_cases::ManagementUseCases::new(
            Arc::new(CreatePortal::new(
                registry.clone(),
                economy.clone(),
                host.clock.clone(),
                settings.portals.clone(),
            )),
            Arc::new(RemovePortal::new(registry.clone(), economy)),
            Arc::new(ClearPortals::new(registry.clone())),
            Arc::new(ExitPoints::new(
                registry.clone(),
                settings.portals.exit_removal_radius,
            )),
            Arc::new(PortalConfig::new(registry.clone())),
            Arc::new(PortalQueries::new(
                registry.clone(),
                settings.trigger.detection_radius,
            )),
        );

        let movement = use_cases::MovementUseCases::new(Arc::new(PortalTrigger::new(
            registry.clone(),
            teleport.clone(),
            host.clock,
            settings.trigger.clone(),
        )));

        Self {
            registry,
            cooldowns,
            store,
            settings,
            use_cases: UseCases {
                teleport: use_cases::TeleportUseCases::new(teleport),
                management,
                movement,
            },
        }
    }

    /// Replace the registry contents with what the store holds.
    pub fn load(&self) -> Result<usize, StoreError> {
        let portals = self.store.load_all()?;
        let loaded = self.registry.load(portals);
        tracing::info!(loaded, "Loaded portals");
        Ok(loaded)
    }

    /// Write the registry through the store.
    pub fn save(&self) -> Result<usize, StoreError> {
        let portals = self.registry.snapshot();
        self.store.save_all(&portals)?;
        Ok(portals.len())
    }

    /// Autosave worker for the configured interval, if autosave is on.
    pub fn autosave(&self) -> Option<PortalAutosave> {
        self.settings.autosave_interval().map(|interval| {
            PortalAutosave::new(self.registry.clone(), self.store.clone(), interval)
        })
    }
}
