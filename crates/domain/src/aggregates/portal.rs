//! Portal aggregate - A named, owned teleport origin
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: all state goes through methods so exit-point and
//!   cursor invariants cannot be broken from outside
//! - **Valid by construction**: `new()` takes a pre-validated `PortalName`
//! - **Builder pattern**: fluent `with_*` methods for optional attributes
//!
//! The sequential cursor is the only piece of state mutated during a
//! teleport. Callers that share a portal across threads must hold the
//! portal's lock around [`Portal::next_sequential_exit`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::ActorId;
use crate::value_objects::{Location, PortalKey, PortalName, RequiredItem};

// ============================================================================
// Exit strategy enums
// ============================================================================

/// Where a portal sends its travelers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitType {
    /// The destination world's spawn point
    #[default]
    Spawn,
    /// The traveler's bed, or spawn when no bed is bound
    Bed,
    /// One of the portal's exit points, chosen by the selection mode
    Custom,
    /// A uniformly random exit point, regardless of selection mode
    Random,
}

impl ExitType {
    /// Cycle order used by the management menu.
    pub fn next(self) -> Self {
        match self {
            Self::Spawn => Self::Bed,
            Self::Bed => Self::Custom,
            Self::Custom => Self::Random,
            Self::Random => Self::Spawn,
        }
    }

    /// Whether this exit type draws from the portal's exit points.
    pub fn uses_exit_points(self) -> bool {
        matches!(self, Self::Custom | Self::Random)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spawn => "SPAWN",
            Self::Bed => "BED",
            Self::Custom => "CUSTOM",
            Self::Random => "RANDOM",
        }
    }
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExitType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPAWN" => Ok(Self::Spawn),
            "BED" => Ok(Self::Bed),
            "CUSTOM" => Ok(Self::Custom),
            "RANDOM" => Ok(Self::Random),
            other => Err(DomainError::parse(format!("Unknown exit type: {other}"))),
        }
    }
}

/// How a `Custom` portal picks among several exit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    First,
    #[default]
    Random,
    Sequential,
    Nearest,
}

impl SelectionMode {
    pub fn next(self) -> Self {
        match self {
            Self::First => Self::Random,
            Self::Random => Self::Sequential,
            Self::Sequential => Self::Nearest,
            Self::Nearest => Self::First,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::First => "Always use the first exit point",
            Self::Random => "Pick a random exit point",
            Self::Sequential => "Cycle through exit points in order",
            Self::Nearest => "Use the exit point closest to the traveler",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Random => "RANDOM",
            Self::Sequential => "SEQUENTIAL",
            Self::Nearest => "NEAREST",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIRST" => Ok(Self::First),
            "RANDOM" => Ok(Self::Random),
            "SEQUENTIAL" => Ok(Self::Sequential),
            "NEAREST" => Ok(Self::Nearest),
            other => Err(DomainError::parse(format!(
                "Unknown selection mode: {other}"
            ))),
        }
    }
}

// ============================================================================
// Portal
// ============================================================================

/// A named teleport origin owned by one actor.
///
/// # Invariants
///
/// - `sequential_cursor < exit_points.len()` whenever `exit_points` is non-empty,
///   and `0` when it is empty
/// - `exit_points` holds no duplicates
/// - switching `exit_type` away from `Custom` or `Random` clears `exit_points`
/// - `cost` and `creation_cost` are finite and non-negative
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    // Identity
    name: PortalName,
    owner: ActorId,
    location: Location,
    created_at: DateTime<Utc>,

    // Exit strategy
    exit_type: ExitType,
    selection_mode: SelectionMode,
    /// Single-exit field kept for older saves; mirrors the first exit point
    custom_exit: Option<Location>,
    exit_points: Vec<Location>,
    sequential_cursor: usize,

    // Pricing
    cost: f64,
    creation_cost: f64,

    // Activation
    kit_name: Option<String>,
    kit_to_give: Option<String>,
    required_permission: Option<String>,
    required_kit: Option<String>,
    required_items: Vec<RequiredItem>,

    show_particles: bool,
}

impl Portal {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(
        name: PortalName,
        location: Location,
        owner: ActorId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            owner,
            location,
            created_at,
            exit_type: ExitType::default(),
            selection_mode: SelectionMode::default(),
            custom_exit: None,
            exit_points: Vec::new(),
            sequential_cursor: 0,
            cost: 0.0,
            creation_cost: 0.0,
            kit_name: None,
            kit_to_give: None,
            required_permission: None,
            required_kit: None,
            required_items: Vec::new(),
            show_particles: true,
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_exit_type(mut self, exit_type: ExitType) -> Self {
        self.set_exit_type(exit_type);
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.set_selection_mode(mode);
        self
    }

    /// Builder: append exit points in order, skipping duplicates.
    pub fn with_exit_points(mut self, points: impl IntoIterator<Item = Location>) -> Self {
        for point in points {
            self.add_exit_point(point);
        }
        self
    }

    /// Builder: restore the legacy single exit without touching `exit_points`.
    pub fn with_legacy_custom_exit(mut self, exit: Option<Location>) -> Self {
        self.custom_exit = exit;
        self
    }

    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative or non-finite cost.
    pub fn with_cost(mut self, cost: f64) -> Result<Self, DomainError> {
        self.set_cost(cost)?;
        Ok(self)
    }

    pub fn with_creation_cost(mut self, creation_cost: f64) -> Self {
        self.set_creation_cost(creation_cost);
        self
    }

    pub fn with_kit_name(mut self, kit_name: Option<String>) -> Self {
        self.kit_name = kit_name;
        self
    }

    pub fn with_kit_to_give(mut self, kit: Option<String>) -> Self {
        self.set_kit_to_give(kit);
        self
    }

    pub fn with_required_permission(mut self, permission: Option<String>) -> Self {
        self.set_required_permission(permission);
        self
    }

    pub fn with_required_kit(mut self, kit: Option<String>) -> Self {
        self.set_required_kit(kit);
        self
    }

    pub fn with_required_items(mut self, items: impl IntoIterator<Item = RequiredItem>) -> Self {
        for item in items {
            self.add_required_item(item);
        }
        self
    }

    pub fn with_show_particles(mut self, show: bool) -> Self {
        self.show_particles = show;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn name(&self) -> &PortalName {
        &self.name
    }

    #[inline]
    pub fn key(&self) -> PortalKey {
        self.name.key()
    }

    #[inline]
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    #[inline]
    pub fn is_owned_by(&self, actor: ActorId) -> bool {
        self.owner == actor
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn exit_type(&self) -> ExitType {
        self.exit_type
    }

    #[inline]
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    #[inline]
    pub fn custom_exit(&self) -> Option<&Location> {
        self.custom_exit.as_ref()
    }

    #[inline]
    pub fn exit_points(&self) -> &[Location] {
        &self.exit_points
    }

    #[inline]
    pub fn sequential_cursor(&self) -> usize {
        self.sequential_cursor
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn creation_cost(&self) -> f64 {
        self.creation_cost
    }

    #[inline]
    pub fn kit_name(&self) -> Option<&str> {
        self.kit_name.as_deref()
    }

    #[inline]
    pub fn kit_to_give(&self) -> Option<&str> {
        self.kit_to_give.as_deref()
    }

    /// The kit granted after a teleport: `kit_to_give`, else the legacy `kit_name`.
    pub fn effective_kit_to_give(&self) -> Option<&str> {
        self.kit_to_give().or_else(|| self.kit_name())
    }

    #[inline]
    pub fn required_permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }

    #[inline]
    pub fn required_kit(&self) -> Option<&str> {
        self.required_kit.as_deref()
    }

    #[inline]
    pub fn required_items(&self) -> &[RequiredItem] {
        &self.required_items
    }

    #[inline]
    pub fn show_particles(&self) -> bool {
        self.show_particles
    }

    pub fn has_valid_exit_points(&self) -> bool {
        !self.exit_points.is_empty()
    }

    /// Short text for listings, e.g. `CUSTOM (3 points, SEQUENTIAL)`.
    pub fn exit_description(&self) -> String {
        match self.exit_type {
            ExitType::Spawn => "World spawn".to_string(),
            ExitType::Bed => "Bed (or spawn)".to_string(),
            ExitType::Custom | ExitType::Random if self.exit_points.is_empty() => {
                match &self.custom_exit {
                    Some(exit) => format!("{} ({})", self.exit_type, exit),
                    None => format!("{} (no exit points)", self.exit_type),
                }
            }
            ExitType::Custom => format!(
                "CUSTOM ({} points, {})",
                self.exit_points.len(),
                self.selection_mode
            ),
            ExitType::Random => format!("RANDOM ({} points)", self.exit_points.len()),
        }
    }

    // =========================================================================
    // Exit strategy
    // =========================================================================

    /// Switching to `Spawn` or `Bed` drops all exit points.
    pub fn set_exit_type(&mut self, exit_type: ExitType) {
        self.exit_type = exit_type;
        if !exit_type.uses_exit_points() {
            self.clear_exit_points();
        }
    }

    pub fn cycle_exit_type(&mut self) -> ExitType {
        self.set_exit_type(self.exit_type.next());
        self.exit_type
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
        self.sequential_cursor = 0;
    }

    pub fn cycle_selection_mode(&mut self) -> SelectionMode {
        self.set_selection_mode(self.selection_mode.next());
        self.selection_mode
    }

    /// Append an exit point. Returns `false` if the exact point is already present.
    pub fn add_exit_point(&mut self, point: Location) -> bool {
        if self.exit_points.contains(&point) {
            return false;
        }
        if self.custom_exit.is_none() {
            self.custom_exit = Some(point.clone());
        }
        self.exit_points.push(point);
        true
    }

    /// Remove an exact exit point. Returns `false` if it was not present.
    pub fn remove_exit_point(&mut self, point: &Location) -> bool {
        match self.exit_points.iter().position(|p| p == point) {
            Some(index) => self.remove_exit_point_at(index).is_some(),
            None => false,
        }
    }

    pub fn remove_exit_point_at(&mut self, index: usize) -> Option<Location> {
        if index >= self.exit_points.len() {
            return None;
        }
        let removed = self.exit_points.remove(index);
        if self.custom_exit.as_ref() == Some(&removed) {
            self.custom_exit = self.exit_points.first().cloned();
        }
        if self.sequential_cursor >= self.exit_points.len() {
            self.sequential_cursor = 0;
        }
        Some(removed)
    }

    pub fn clear_exit_points(&mut self) {
        self.exit_points.clear();
        self.custom_exit = None;
        self.sequential_cursor = 0;
    }

    /// Replace all exit points with a single one.
    pub fn set_custom_exit(&mut self, exit: Location) {
        self.clear_exit_points();
        self.add_exit_point(exit);
    }

    /// Read the point under the cursor and advance it, wrapping at the end.
    pub fn next_sequential_exit(&mut self) -> Option<Location> {
        let point = self.exit_points.get(self.sequential_cursor)?.clone();
        self.sequential_cursor = (self.sequential_cursor + 1) % self.exit_points.len();
        Some(point)
    }

    /// Closest exit point in the same world as `from`.
    pub fn nearest_exit_point(&self, from: &Location) -> Option<&Location> {
        self.exit_points
            .iter()
            .filter_map(|point| point.distance_squared(from).map(|d2| (point, d2)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(point, _)| point)
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative or non-finite cost.
    pub fn set_cost(&mut self, cost: f64) -> Result<(), DomainError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::validation(format!(
                "Portal cost must be a non-negative number, got {cost}"
            )));
        }
        self.cost = cost;
        Ok(())
    }

    /// Add `delta` to the cost, never going below zero.
    pub fn adjust_cost(&mut self, delta: f64) -> f64 {
        let adjusted = self.cost + delta;
        self.cost = if adjusted.is_finite() {
            adjusted.max(0.0)
        } else {
            self.cost
        };
        self.cost
    }

    pub fn set_creation_cost(&mut self, creation_cost: f64) {
        if creation_cost.is_finite() {
            self.creation_cost = creation_cost.max(0.0);
        }
    }

    // =========================================================================
    // Activation requirements
    // =========================================================================

    pub fn set_required_permission(&mut self, permission: Option<String>) {
        self.required_permission = non_blank(permission);
    }

    pub fn set_required_kit(&mut self, kit: Option<String>) {
        self.required_kit = non_blank(kit);
    }

    pub fn set_kit_to_give(&mut self, kit: Option<String>) {
        self.kit_to_give = non_blank(kit);
    }

    /// Returns `false` if an identical requirement is already present.
    pub fn add_required_item(&mut self, item: RequiredItem) -> bool {
        if self.required_items.contains(&item) {
            return false;
        }
        self.required_items.push(item);
        true
    }

    pub fn remove_required_item(&mut self, index: usize) -> Option<RequiredItem> {
        (index < self.required_items.len()).then(|| self.required_items.remove(index))
    }

    pub fn clear_required_items(&mut self) {
        self.required_items.clear();
    }

    // =========================================================================
    // Cosmetics
    // =========================================================================

    pub fn set_show_particles(&mut self, show: bool) {
        self.show_particles = show;
    }

    pub fn toggle_particles(&mut self) -> bool {
        self.show_particles = !self.show_particles;
        self.show_particles
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Material;

    fn point(world: &str, x: f64) -> Location {
        Location::new(world, x, 64.0, 0.0)
    }

    fn portal() -> Portal {
        Portal::new(
            PortalName::new("Hub").unwrap(),
            point("world", 0.0),
            ActorId::new(),
            Utc::now(),
        )
    }

    #[test]
    fn new_portal_defaults() {
        let p = portal();
        assert_eq!(p.exit_type(), ExitType::Spawn);
        assert_eq!(p.selection_mode(), SelectionMode::Random);
        assert!(p.exit_points().is_empty());
        assert_eq!(p.cost(), 0.0);
        assert!(p.show_particles());
        assert_eq!(p.key(), PortalKey::from_name("HUB"));
    }

    #[test]
    fn exit_type_cycles_through_all_variants() {
        let mut t = ExitType::Spawn;
        let mut seen = vec![];
        for _ in 0..4 {
            t = t.next();
            seen.push(t);
        }
        assert_eq!(
            seen,
            vec![ExitType::Bed, ExitType::Custom, ExitType::Random, ExitType::Spawn]
        );
    }

    #[test]
    fn selection_mode_parses_case_insensitively() {
        assert_eq!("sequential".parse::<SelectionMode>().unwrap(), SelectionMode::Sequential);
        assert_eq!("Nearest".parse::<SelectionMode>().unwrap(), SelectionMode::Nearest);
        assert!("closest".parse::<SelectionMode>().is_err());
        assert_eq!(SelectionMode::Nearest.next(), SelectionMode::First);
    }

    #[test]
    fn switching_to_spawn_clears_exit_points() {
        let mut p = portal()
            .with_exit_type(ExitType::Custom)
            .with_exit_points([point("world", 1.0), point("world", 2.0)]);
        assert_eq!(p.exit_points().len(), 2);

        p.set_exit_type(ExitType::Random);
        assert_eq!(p.exit_points().len(), 2);

        p.set_exit_type(ExitType::Spawn);
        assert!(p.exit_points().is_empty());
        assert!(p.custom_exit().is_none());
        assert_eq!(p.sequential_cursor(), 0);
    }

    #[test]
    fn points_added_under_spawn_survive_until_next_switch() {
        let mut p = portal().with_exit_type(ExitType::Spawn);
        assert!(p.add_exit_point(point("world", 1.0)));
        assert_eq!(p.exit_type(), ExitType::Spawn);
        assert_eq!(p.exit_points().len(), 1);

        p.set_exit_type(ExitType::Bed);
        assert!(p.exit_points().is_empty());
        assert!(p.custom_exit().is_none());
    }

    #[test]
    fn duplicate_exit_points_are_ignored() {
        let mut p = portal().with_exit_type(ExitType::Custom);
        assert!(p.add_exit_point(point("world", 1.0)));
        assert!(!p.add_exit_point(point("world", 1.0)));
        assert_eq!(p.exit_points().len(), 1);
        assert_eq!(p.custom_exit(), Some(&point("world", 1.0)));
    }

    #[test]
    fn sequential_exit_wraps() {
        let mut p = portal()
            .with_exit_type(ExitType::Custom)
            .with_exit_points([
                point("world", 1.0),
                point("world", 2.0),
                point("world", 3.0),
            ]);
        let xs: Vec<f64> = (0..4)
            .map(|_| p.next_sequential_exit().unwrap().x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 1.0]);
        assert_eq!(p.sequential_cursor(), 1);
    }

    #[test]
    fn sequential_exit_on_empty_is_none() {
        let mut p = portal().with_exit_type(ExitType::Custom);
        assert!(p.next_sequential_exit().is_none());
    }

    #[test]
    fn removing_points_keeps_cursor_in_range() {
        let mut p = portal()
            .with_exit_type(ExitType::Custom)
            .with_exit_points([
                point("world", 1.0),
                point("world", 2.0),
                point("world", 3.0),
            ]);
        p.next_sequential_exit();
        p.next_sequential_exit();
        assert_eq!(p.sequential_cursor(), 2);

        assert_eq!(p.remove_exit_point_at(2), Some(point("world", 3.0)));
        assert_eq!(p.sequential_cursor(), 0);
        assert!(p.remove_exit_point_at(5).is_none());
    }

    #[test]
    fn removing_legacy_exit_promotes_next_point() {
        let mut p = portal()
            .with_exit_type(ExitType::Custom)
            .with_exit_points([point("world", 1.0), point("world", 2.0)]);
        assert!(p.remove_exit_point(&point("world", 1.0)));
        assert_eq!(p.custom_exit(), Some(&point("world", 2.0)));
        assert!(!p.remove_exit_point(&point("world", 1.0)));
    }

    #[test]
    fn nearest_ignores_other_worlds() {
        let p = portal().with_exit_type(ExitType::Custom).with_exit_points([
            point("world_nether", 1.0),
            point("world", 50.0),
            point("world", 10.0),
        ]);
        let from = point("world", 0.0);
        assert_eq!(p.nearest_exit_point(&from), Some(&point("world", 10.0)));
        assert_eq!(p.nearest_exit_point(&point("world_the_end", 0.0)), None);
    }

    #[test]
    fn cycling_selection_mode_resets_cursor() {
        let mut p = portal()
            .with_exit_type(ExitType::Custom)
            .with_selection_mode(SelectionMode::Sequential)
            .with_exit_points([point("world", 1.0), point("world", 2.0)]);
        p.next_sequential_exit();
        assert_eq!(p.cycle_selection_mode(), SelectionMode::Nearest);
        assert_eq!(p.sequential_cursor(), 0);
    }

    #[test]
    fn cost_validation() {
        let mut p = portal();
        assert!(p.set_cost(-1.0).is_err());
        assert!(p.set_cost(f64::NAN).is_err());
        p.set_cost(10.0).unwrap();
        assert_eq!(p.adjust_cost(-25.0), 0.0);
        assert_eq!(p.adjust_cost(5.0), 5.0);
    }

    #[test]
    fn kit_to_give_falls_back_to_legacy_kit_name() {
        let p = portal().with_kit_name(Some("starter".into()));
        assert_eq!(p.effective_kit_to_give(), Some("starter"));
        let p = p.with_kit_to_give(Some("explorer".into()));
        assert_eq!(p.effective_kit_to_give(), Some("explorer"));
    }

    #[test]
    fn blank_requirements_are_cleared() {
        let mut p = portal();
        p.set_required_permission(Some("  ".into()));
        assert!(p.required_permission().is_none());
        p.set_required_kit(Some(" vip ".into()));
        assert_eq!(p.required_kit(), Some("vip"));
    }

    #[test]
    fn required_items_behave_as_a_set() {
        let torch = RequiredItem::new(Material::new("TORCH").unwrap(), 3, true).unwrap();
        let mut p = portal();
        assert!(p.add_required_item(torch.clone()));
        assert!(!p.add_required_item(torch.clone()));
        assert_eq!(p.required_items().len(), 1);
        assert_eq!(p.remove_required_item(0), Some(torch));
        assert!(p.remove_required_item(0).is_none());
    }

    #[test]
    fn exit_description_mentions_mode() {
        let p = portal()
            .with_exit_type(ExitType::Custom)
            .with_selection_mode(SelectionMode::Sequential)
            .with_exit_points([point("world", 1.0)]);
        assert_eq!(p.exit_description(), "CUSTOM (1 points, SEQUENTIAL)");
        assert_eq!(
            portal().with_exit_type(ExitType::Random).exit_description(),
            "RANDOM (no exit points)"
        );
    }
}
