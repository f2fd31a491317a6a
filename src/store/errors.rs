//! Document store error type
//!
//! Backends report failures as an opaque message plus an optional numeric
//! code. The only code the adapter interprets is the duplicate-key code.

use thiserror::Error;

/// Backend code for a unique-index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    code: Option<i32>,
    message: String,
}

impl StoreError {
    /// Create an error without a backend code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Create an error carrying a backend code
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Create a unique-index violation
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::with_code(DUPLICATE_KEY_CODE, message)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is a unique-index violation
    pub fn is_duplicate_key(&self) -> bool {
        self.code == Some(DUPLICATE_KEY_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_detection() {
        assert!(StoreError::duplicate_key("dup").is_duplicate_key());
        assert!(StoreError::with_code(11000, "dup").is_duplicate_key());
        assert!(!StoreError::with_code(2, "bad value").is_duplicate_key());
        assert!(!StoreError::new("connection reset").is_duplicate_key());
    }

    #[test]
    fn test_display_is_message() {
        let err = StoreError::with_code(13, "unauthorized");
        assert_eq!(err.to_string(), "unauthorized");
        assert_eq!(err.code(), Some(13));
    }
}
