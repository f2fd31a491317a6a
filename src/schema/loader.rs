//! Schema loading from JSON
//!
//! Schema documents map each type name to an ordered list of field
//! definitions:
//!
//! ```json
//! {
//!   "user": [
//!     { "name": "name" },
//!     { "name": "tags", "is_array": true },
//!     { "name": "posts", "storage_type": "reference", "is_array": true, "is_denormalized": true }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDefinition, RecordType};
use super::view::SchemaView;

impl SchemaView {
    /// Parses a schema document.
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        Self::parse(content, "<in-memory>")
    }

    /// Loads a schema document from disk.
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, location: &str) -> SchemaResult<Self> {
        let raw: BTreeMap<String, Vec<FieldDefinition>> = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(location, format!("Invalid JSON: {}", e)))?;

        let mut view = SchemaView::new();
        for (name, fields) in raw {
            view.register(RecordType::new(name, fields)?)?;
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StorageType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCHEMA: &str = r#"{
        "user": [
            { "name": "name" },
            { "name": "tags", "is_array": true },
            { "name": "avatar", "storage_type": "binary" },
            { "name": "posts", "storage_type": "reference", "is_array": true, "is_denormalized": true }
        ],
        "post": [
            { "name": "title" },
            { "name": "author", "storage_type": "reference" }
        ]
    }"#;

    #[test]
    fn test_parse_schema_document() {
        let schema = SchemaView::from_json_str(SCHEMA).unwrap();
        assert_eq!(schema.len(), 2);

        let user = schema.fields_of("user").unwrap();
        let names: Vec<&str> = user.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "tags", "avatar", "posts"]);

        let posts = user.field("posts").unwrap();
        assert_eq!(posts.storage_type, StorageType::Reference);
        assert!(posts.is_array);
        assert!(posts.is_denormalized);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = SchemaView::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_invalid_field_propagates() {
        let err = SchemaView::from_json_str(r#"{"user": [{"name": "_id"}]}"#).unwrap_err();
        assert_eq!(err.code(), "DOCBRIDGE_SCHEMA_RESERVED_FIELD");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let schema = SchemaView::from_file(file.path()).unwrap();
        assert!(schema.contains("post"));
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let err = SchemaView::from_file(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { .. }));
    }
}
