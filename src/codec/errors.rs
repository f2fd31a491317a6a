//! Record codec error types
//!
//! Error codes:
//! - DOCBRIDGE_INVALID_BINARY

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Codec failures
///
/// Shape mismatches other than binary representation are resolved by
/// default-value substitution and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Stored value of a binary field is neither raw bytes nor a buffer wrapper
    #[error("Could not decode binary field '{field}': found {found}")]
    InvalidBinaryRepresentation { field: String, found: String },
}

impl CodecError {
    pub fn invalid_binary(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidBinaryRepresentation {
            field: field.into(),
            found: found.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::InvalidBinaryRepresentation { .. } => "DOCBRIDGE_INVALID_BINARY",
        }
    }
}
