//! Validated portal names and their case-insensitive registry key
//!
//! These newtypes ensure that names are valid by construction:
//! - Trimmed of leading/trailing whitespace
//! - Within length limits
//! - Free of whitespace and path separators, so they can be used as
//!   command arguments and storage keys

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Minimum length for portal names
pub const MIN_PORTAL_NAME_LENGTH: usize = 3;

/// Maximum length for portal names
pub const MAX_PORTAL_NAME_LENGTH: usize = 32;

// ============================================================================
// PortalName
// ============================================================================

/// A validated portal name (3..=32 chars, trimmed, no whitespace).
///
/// The original casing is preserved for display; lookups go through
/// [`PortalKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortalName(String);

impl PortalName {
    /// Create a new validated portal name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is shorter than 3 or longer than 32 characters after trimming
    /// - The name contains whitespace, `/`, `\` or `.`
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        let length = trimmed.chars().count();
        if length < MIN_PORTAL_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Portal name must be at least {} characters",
                MIN_PORTAL_NAME_LENGTH
            )));
        }
        if length > MAX_PORTAL_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Portal name cannot exceed {} characters",
                MAX_PORTAL_NAME_LENGTH
            )));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '.'))
        {
            return Err(DomainError::validation(format!(
                "Portal name '{}' contains invalid characters",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The case-insensitive key this name is registered under.
    pub fn key(&self) -> PortalKey {
        PortalKey::from_name(&self.0)
    }
}

impl fmt::Display for PortalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PortalName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PortalName> for String {
    fn from(name: PortalName) -> String {
        name.0
    }
}

// ============================================================================
// PortalKey
// ============================================================================

/// Lower-cased lookup key; `Hub`, `HUB` and `hub` are the same portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalKey(String);

impl PortalKey {
    /// Build a key from any user-supplied name, valid or not.
    pub fn from_name(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
