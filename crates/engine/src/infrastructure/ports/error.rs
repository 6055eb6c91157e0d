//! Error types for port operations.

/// Portal storage errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// The document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A single record was readable but violates a portal invariant.
    #[error("Invalid portal record '{name}': {message}")]
    InvalidRecord { name: String, message: String },
}

impl StoreError {
    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create an InvalidRecord error.
    pub fn invalid_record(name: impl ToString, message: impl ToString) -> Self {
        Self::InvalidRecord {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Economy provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconomyError {
    #[error("Economy service unavailable")]
    Unavailable,
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl EconomyError {
    pub fn transaction(message: impl ToString) -> Self {
        Self::Transaction(message.to_string())
    }
}
