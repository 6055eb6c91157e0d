//! Engine settings
//!
//! Every tunable of the teleport pipeline, portal management and the
//! movement trigger lives here. Settings are serde-serializable so that a
//! JSON document can be used as a base, then `PORTAL2EXIT_*` environment
//! variables override individual keys.
//!
//! Values that fail to parse keep their previous value and log a warning.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use portal2exit_domain::{Location, RequiredItem};

use super::persistence::RequiredItemRecord;

/// Hard upper bound on the safe-landing search radius.
pub const MAX_SAFE_SEARCH_RADIUS: u32 = 10;

/// Environment variable pointing at a JSON settings document.
pub const SETTINGS_FILE_ENV: &str = "PORTAL2EXIT_SETTINGS_FILE";

// ============================================================================
// Setting groups
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownSettings {
    /// Seconds between two teleports of the same actor
    pub seconds: u64,
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self { seconds: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomySettings {
    pub enabled: bool,
    /// Usage cost for portals without their own cost
    pub default_cost: f64,
    /// Fraction of each usage fee paid to the portal owner (0.1 = 10%)
    pub owner_share: f64,
    pub creation_cost: f64,
    /// Each portal already owned raises the creation cost by this factor
    pub creation_scaling: f64,
    /// Percentage of the creation cost refunded on removal
    pub refund_percentage: f64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            default_cost: 100.0,
            owner_share: 0.1,
            creation_cost: 1000.0,
            creation_scaling: 0.5,
            refund_percentage: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub enabled: bool,
    pub find_safe_location: bool,
    pub search_radius: u32,
}

impl SafetySettings {
    pub fn effective_radius(&self) -> u32 {
        self.search_radius.min(MAX_SAFE_SEARCH_RADIUS)
    }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            find_safe_location: true,
            search_radius: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationSettings {
    pub check_permission: bool,
    pub check_kit: bool,
    pub check_items: bool,
    /// Permission applied to portals without their own requirement
    pub default_permission: Option<String>,
    /// Ask the kit plugin whether the required kit was received
    pub check_kit_received: bool,
    /// Items applied to portals without their own requirements
    pub default_items: Vec<RequiredItemRecord>,
}

impl ActivationSettings {
    pub fn default_required_items(&self) -> Vec<RequiredItem> {
        self.default_items
            .iter()
            .cloned()
            .filter_map(|record| match RequiredItem::try_from(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring invalid default required item");
                    None
                }
            })
            .collect()
    }
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            check_permission: true,
            check_kit: true,
            check_items: true,
            default_permission: Some("portal2exit.use".to_string()),
            check_kit_received: true,
            default_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// 0 = unlimited
    pub max_per_player: u32,
    /// 0 = autosave disabled
    pub autosave_minutes: u64,
    /// Used when a custom/random portal has nowhere to send travelers
    pub fallback_exit: Option<Location>,
    /// How far an actor may stand from an exit point to remove it
    pub exit_removal_radius: f64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            max_per_player: 10,
            autosave_minutes: 5,
            fallback_exit: None,
            exit_removal_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    pub detection_radius: f64,
    pub trigger_radius: f64,
    pub throttle_millis: u64,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            detection_radius: 5.0,
            trigger_radius: 1.0,
            throttle_millis: 250,
        }
    }
}

// ============================================================================
// EngineSettings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub cooldown: CooldownSettings,
    pub economy: EconomySettings,
    pub safety: SafetySettings,
    pub activation: ActivationSettings,
    pub portals: PortalSettings,
    pub trigger: TriggerSettings,
}

impl EngineSettings {
    /// Load settings from the process environment (after `.env`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = lookup(SETTINGS_FILE_ENV)
            .map(|path| Self::from_file(&path))
            .unwrap_or_default();
        settings.apply_overrides(&lookup);
        settings
    }

    fn from_file(path: &str) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Self>(&raw).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => {
                tracing::info!(path, "Loaded settings file");
                settings
            }
            Err(error) => {
                tracing::warn!(path, %error, "Could not read settings file, using defaults");
                Self::default()
            }
        }
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        // Cooldown
        apply(
            lookup,
            "PORTAL2EXIT_COOLDOWN_SECONDS",
            &mut self.cooldown.seconds,
        );

        // Economy
        apply(
            lookup,
            "PORTAL2EXIT_ECONOMY_ENABLED",
            &mut self.economy.enabled,
        );
        apply(
            lookup,
            "PORTAL2EXIT_DEFAULT_COST",
            &mut self.economy.default_cost,
        );
        apply(
            lookup,
            "PORTAL2EXIT_OWNER_SHARE",
            &mut self.economy.owner_share,
        );
        apply(
            lookup,
            "PORTAL2EXIT_CREATION_COST",
            &mut self.economy.creation_cost,
        );
        apply(
            lookup,
            "PORTAL2EXIT_CREATION_SCALING",
            &mut self.economy.creation_scaling,
        );
        apply(
            lookup,
            "PORTAL2EXIT_REFUND_PERCENTAGE",
            &mut self.economy.refund_percentage,
        );

        // Safety
        apply(
            lookup,
            "PORTAL2EXIT_SAFETY_CHECKS",
            &mut self.safety.enabled,
        );
        apply(
            lookup,
            "PORTAL2EXIT_FIND_SAFE_LOCATION",
            &mut self.safety.find_safe_location,
        );
        apply(
            lookup,
            "PORTAL2EXIT_SAFE_SEARCH_RADIUS",
            &mut self.safety.search_radius,
        );

        // Activation
        apply(
            lookup,
            "PORTAL2EXIT_CHECK_PERMISSION",
            &mut self.activation.check_permission,
        );
        apply(
            lookup,
            "PORTAL2EXIT_CHECK_KIT",
            &mut self.activation.check_kit,
        );
        apply(
            lookup,
            "PORTAL2EXIT_CHECK_ITEMS",
            &mut self.activation.check_items,
        );
        apply(
            lookup,
            "PORTAL2EXIT_CHECK_KIT_RECEIVED",
            &mut self.activation.check_kit_received,
        );
        if let Some(permission) = lookup("PORTAL2EXIT_DEFAULT_PERMISSION") {
            let permission = permission.trim();
            self.activation.default_permission =
                (!permission.is_empty()).then(|| permission.to_string());
        }

        // Portals
        apply(
            lookup,
            "PORTAL2EXIT_MAX_PORTALS",
            &mut self.portals.max_per_player,
        );
        apply(
            lookup,
            "PORTAL2EXIT_AUTOSAVE_MINUTES",
            &mut self.portals.autosave_minutes,
        );
        apply(
            lookup,
            "PORTAL2EXIT_EXIT_REMOVAL_RADIUS",
            &mut self.portals.exit_removal_radius,
        );

        // Trigger
        apply(
            lookup,
            "PORTAL2EXIT_DETECTION_RADIUS",
            &mut self.trigger.detection_radius,
        );
        apply(
            lookup,
            "PORTAL2EXIT_TRIGGER_RADIUS",
            &mut self.trigger.trigger_radius,
        );
        apply(
            lookup,
            "PORTAL2EXIT_TRIGGER_THROTTLE_MS",
            &mut self.trigger.throttle_millis,
        );
    }

    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_secs(self.cooldown.seconds)
    }

    /// `None` when autosave is disabled.
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.portals.autosave_minutes > 0)
            .then(|| Duration::from_secs(self.portals.autosave_minutes * 60))
    }
}

fn apply<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparsable setting"),
    }
}
