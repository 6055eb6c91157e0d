//! Domain error type
//!
//! Every fallible constructor and portal invariant reports through
//! `DomainError`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value is out of range or malformed (names, amounts, costs)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The key is already taken
    #[error("{entity_type} '{id}' already exists")]
    Duplicate {
        entity_type: &'static str,
        id: String,
    },

    /// Unknown enum or wire name
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `id` is the display name, not the lowercase key.
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Used by `FromStr` impls:
    ///
    /// ```ignore
    /// "sideways".parse::<ExitType>() // Err(DomainError::Parse("Unknown exit type: sideways"))
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
