//! Field and record type definitions
//!
//! A record type is an ordered list of field definitions. Field order is
//! the declaration order and is what every default-materialization pass
//! iterates over.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use crate::store::ID_KEY;

/// Primary-key field name of a generic record
pub const PRIMARY_KEY: &str = "id";

/// How a field's value is stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Plain JSON value
    #[default]
    Scalar,
    /// Raw bytes, normalized on decode
    Binary,
    /// Identifier of a record of another type
    Reference,
}

impl StorageType {
    /// Returns the type name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Scalar => "scalar",
            StorageType::Binary => "binary",
            StorageType::Reference => "reference",
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name, as seen by generic records and storage documents
    pub name: String,
    /// Storage representation
    #[serde(default)]
    pub storage_type: StorageType,
    /// Whether the field holds a sequence of values
    #[serde(default)]
    pub is_array: bool,
    /// Whether the field is derived from the inverse side of a relationship
    #[serde(default)]
    pub is_denormalized: bool,
}

impl FieldDefinition {
    /// Create a field with an explicit storage type
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
            is_array: false,
            is_denormalized: false,
        }
    }

    /// Create a scalar field
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Scalar)
    }

    /// Create a binary field
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Binary)
    }

    /// Create a reference field
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Reference)
    }

    /// Mark the field as array-typed
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Mark the field as denormalized
    pub fn denormalized(mut self) -> Self {
        self.is_denormalized = true;
        self
    }

    /// Value materialized when the field is absent: `[]` for arrays, null otherwise
    pub fn default_value(&self) -> Value {
        if self.is_array {
            Value::Array(Vec::new())
        } else {
            Value::Null
        }
    }

    pub fn is_binary(&self) -> bool {
        self.storage_type == StorageType::Binary
    }
}

/// Field metadata for a single record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDefinition>,
    positions: HashMap<String, usize>,
}

impl RecordType {
    /// Creates a record type, rejecting duplicate and reserved field names.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> SchemaResult<Self> {
        let name = name.into();
        let mut positions = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            if field.name == PRIMARY_KEY || field.name == ID_KEY {
                return Err(SchemaError::ReservedField {
                    record_type: name,
                    field: field.name.clone(),
                });
            }
            if positions.insert(field.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateField {
                    record_type: name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            fields,
            positions,
        })
    }

    /// Starts building a record type field by field
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.positions.get(name).map(|&position| &self.fields[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Whether `name` is a declared array field
    pub fn is_array(&self, name: &str) -> bool {
        self.field(name).map_or(false, |f| f.is_array)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RecordType`]
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl RecordTypeBuilder {
    /// Append a field
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> SchemaResult<RecordType> {
        RecordType::new(self.name, self.fields)
    }
}
