//! Stored representation of a portal.
//!
//! Field names and omission rules are the on-disk contract shared with
//! existing save files; keep them stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal2exit_domain::{
    ActorId, DomainError, ExitType, Location, Material, Portal, PortalName, RequiredItem,
    SelectionMode,
};

use crate::infrastructure::ports::StoreError;

fn default_true() -> bool {
    true
}

// =============================================================================
// Stored Types for JSON serialization
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalRecord {
    pub name: String,
    pub location: Location,
    pub owner: ActorId,
    #[serde(default)]
    pub exit_type: ExitType,
    #[serde(default)]
    pub selection_mode: SelectionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_exit: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit_points: Vec<Location>,
    /// Milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_name: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "default_true")]
    pub show_particles: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_items: Vec<RequiredItemRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_kit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_to_give: Option<String>,
    #[serde(default)]
    pub creation_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredItemRecord {
    pub material: Material,
    pub amount: u32,
    #[serde(default = "default_true")]
    pub consume: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

impl From<&RequiredItem> for RequiredItemRecord {
    fn from(item: &RequiredItem) -> Self {
        Self {
            material: item.material().clone(),
            amount: item.amount(),
            consume: item.consume(),
            display_name: item.display_name().map(str::to_string),
            lore: item.lore().to_vec(),
        }
    }
}

impl TryFrom<RequiredItemRecord> for RequiredItem {
    type Error = DomainError;

    fn try_from(record: RequiredItemRecord) -> Result<Self, Self::Error> {
        let mut item = RequiredItem::new(record.material, record.amount, record.consume)?;
        if let Some(name) = record.display_name {
            item = item.with_display_name(name);
        }
        Ok(item.with_lore(record.lore))
    }
}

impl From<&Portal> for PortalRecord {
    fn from(portal: &Portal) -> Self {
        Self {
            name: portal.name().to_string(),
            location: portal.location().clone(),
            owner: portal.owner(),
            exit_type: portal.exit_type(),
            selection_mode: portal.selection_mode(),
            custom_exit: portal.custom_exit().cloned(),
            exit_points: portal.exit_points().to_vec(),
            created_time: Some(portal.created_at().timestamp_millis()),
            kit_name: portal.kit_name().map(str::to_string),
            cost: portal.cost(),
            show_particles: portal.show_particles(),
            required_items: portal
                .required_items()
                .iter()
                .map(RequiredItemRecord::from)
                .collect(),
            required_permission: portal.required_permission().map(str::to_string),
            required_kit: portal.required_kit().map(str::to_string),
            kit_to_give: portal.kit_to_give().map(str::to_string),
            creation_cost: portal.creation_cost(),
        }
    }
}

impl PortalRecord {
    /// Rebuild the aggregate. `now` stands in for a missing creation time.
    ///
    /// The sequential cursor is not stored and restarts at the first point.
    pub fn into_portal(self, now: DateTime<Utc>) -> Result<Portal, StoreError> {
        let invalid = |e: DomainError| StoreError::invalid_record(&self.name, e);

        let name = PortalName::new(self.name.clone()).map_err(invalid)?;
        let created_at = self
            .created_time
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(now);
        let required_items = self
            .required_items
            .iter()
            .cloned()
            .map(RequiredItem::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        let portal = Portal::new(name, self.location.clone(), self.owner, created_at)
            .with_exit_type(self.exit_type)
            .with_selection_mode(self.selection_mode)
            .with_exit_points(self.exit_points.iter().cloned())
            .with_legacy_custom_exit(self.custom_exit.clone())
            .with_cost(self.cost)
            .map_err(invalid)?
            .with_creation_cost(self.creation_cost)
            .with_kit_name(self.kit_name.clone())
            .with_kit_to_give(self.kit_to_give.clone())
            .with_required_permission(self.required_permission.clone())
            .with_required_kit(self.required_kit.clone())
            .with_required_items(required_items)
            .with_show_particles(self.show_particles);

        Ok(portal)
    }
}
