//! Adapter error types
//!
//! Error codes:
//! - DOCBRIDGE_CONFLICT
//! - DOCBRIDGE_INVALID_BINARY
//! - DOCBRIDGE_BACKEND
//! - DOCBRIDGE_UNKNOWN_TYPE
//! - DOCBRIDGE_CONFIG_INVALID

use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Message carried by a duplicate-key conflict
pub const DUPLICATE_KEY_MESSAGE: &str = "Duplicate key.";

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors surfaced by the adapter verbs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Unique-constraint violation on insert
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored binary value could not be decoded
    #[error(transparent)]
    InvalidBinaryRepresentation(#[from] CodecError),

    /// Any other backend failure, passed through unchanged
    #[error("Backend error: {0}")]
    Backend(#[from] StoreError),

    /// The schema view does not define the requested type
    #[error("Unknown record type '{0}'")]
    UnknownType(String),

    /// Adapter configuration could not be read or parsed
    #[error("Invalid configuration at {location}: {reason}")]
    InvalidConfig { location: String, reason: String },
}

impl AdapterError {
    /// Create a duplicate-key conflict
    pub fn duplicate_key() -> Self {
        Self::Conflict(DUPLICATE_KEY_MESSAGE.to_string())
    }

    pub fn invalid_config(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::Conflict(_) => "DOCBRIDGE_CONFLICT",
            AdapterError::InvalidBinaryRepresentation(e) => e.code(),
            AdapterError::Backend(_) => "DOCBRIDGE_BACKEND",
            AdapterError::UnknownType(_) => "DOCBRIDGE_UNKNOWN_TYPE",
            AdapterError::InvalidConfig { .. } => "DOCBRIDGE_CONFIG_INVALID",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AdapterError::Conflict(_))
    }
}
