//! Process-wide schema view
//!
//! Built once at adapter setup and shared read-only afterwards.

use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::RecordType;

/// Registry of record types, keyed by type name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaView {
    types: BTreeMap<String, RecordType>,
}

impl SchemaView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type.
    ///
    /// A type name can only be registered once.
    pub fn register(&mut self, record_type: RecordType) -> SchemaResult<()> {
        if self.types.contains_key(record_type.name()) {
            return Err(SchemaError::DuplicateType(record_type.name().to_string()));
        }
        self.types
            .insert(record_type.name().to_string(), record_type);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_type(mut self, record_type: RecordType) -> SchemaResult<Self> {
        self.register(record_type)?;
        Ok(self)
    }

    /// Field metadata for `name`, if the type is known
    pub fn fields_of(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
