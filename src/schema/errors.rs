//! Schema error types
//!
//! Error codes:
//! - DOCBRIDGE_SCHEMA_DUPLICATE_FIELD
//! - DOCBRIDGE_SCHEMA_RESERVED_FIELD
//! - DOCBRIDGE_SCHEMA_DUPLICATE_TYPE
//! - DOCBRIDGE_SCHEMA_MALFORMED

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema construction and loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Same field declared twice in one type
    #[error("Duplicate field '{field}' in type '{record_type}'")]
    DuplicateField { record_type: String, field: String },

    /// Field uses the primary-key or internal identifier name
    #[error("Field name '{field}' in type '{record_type}' is reserved")]
    ReservedField { record_type: String, field: String },

    /// Same type registered twice
    #[error("Type '{0}' is already registered")]
    DuplicateType(String),

    /// Schema source could not be read or parsed
    #[error("Malformed schema at {location}: {reason}")]
    Malformed { location: String, reason: String },
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateField { .. } => "DOCBRIDGE_SCHEMA_DUPLICATE_FIELD",
            SchemaError::ReservedField { .. } => "DOCBRIDGE_SCHEMA_RESERVED_FIELD",
            SchemaError::DuplicateType(_) => "DOCBRIDGE_SCHEMA_DUPLICATE_TYPE",
            SchemaError::Malformed { .. } => "DOCBRIDGE_SCHEMA_MALFORMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaError::DuplicateType("user".into()).code(),
            "DOCBRIDGE_SCHEMA_DUPLICATE_TYPE"
        );
        assert_eq!(
            SchemaError::malformed("<in-memory>", "bad").code(),
            "DOCBRIDGE_SCHEMA_MALFORMED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = SchemaError::DuplicateField {
            record_type: "user".into(),
            field: "name".into(),
        };
        assert_eq!(err.to_string(), "Duplicate field 'name' in type 'user'");
    }
}
