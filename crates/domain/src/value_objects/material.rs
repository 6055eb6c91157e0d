//! Material names for blocks and item stacks.
//!
//! The host engine owns the real material taxonomy. The domain only keeps
//! the canonical name so that it can compare kinds and match name
//! fragments across engine versions (`MAGMA` vs `MAGMA_BLOCK`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

const NAMESPACE_PREFIX: &str = "minecraft:";

/// A canonical, upper-case material name (e.g. `TORCH`, `SWEET_BERRY_BUSH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Material(String);

impl Material {
    /// Create a material from a host name.
    ///
    /// Accepts namespaced (`minecraft:ender_eye`) and lower-case names.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        let bare = trimmed
            .get(..NAMESPACE_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(NAMESPACE_PREFIX))
            .map_or(trimmed, |_| &trimmed[NAMESPACE_PREFIX.len()..]);
        if bare.is_empty() {
            return Err(DomainError::validation("Material name cannot be empty"));
        }
        Ok(Self(bare.to_ascii_uppercase()))
    }

    /// Plain air.
    pub fn air() -> Self {
        Self("AIR".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Air in any of its variants (`AIR`, `CAVE_AIR`, `VOID_AIR`).
    pub fn is_air(&self) -> bool {
        self.0 == "AIR" || self.0.ends_with("_AIR")
    }

    /// Case-insensitive substring match against any of `fragments`.
    pub fn contains_any(&self, fragments: &[&str]) -> bool {
        fragments
            .iter()
            .any(|fragment| self.0.contains(&fragment.to_ascii_uppercase()))
    }

    /// Human-readable form: `SWEET_BERRY_BUSH` -> `Sweet Berry Bush`.
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let lower = word.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Material {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Material> for String {
    fn from(material: Material) -> String {
        material.0
    }
}
