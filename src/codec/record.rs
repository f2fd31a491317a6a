//! Generic record shape
//!
//! `fields` holds everything a caller may write back. Denormalized fields
//! live in `derived`: readable through [`GenericRecord::get`], invisible to
//! `fields` iteration and never read by encode.

use serde_json::{Map, Value};

use super::binary::value_to_bytes;
use crate::schema::PRIMARY_KEY;

/// A record in the storage-agnostic shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericRecord {
    /// Primary key; `None` until assigned
    pub id: Option<String>,
    /// Writable fields
    pub fields: Map<String, Value>,
    /// Denormalized, read-only fields
    pub derived: Map<String, Value>,
}

impl GenericRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Builder-style field assignment
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Reads a writable or derived field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).or_else(|| self.derived.get(field))
    }

    /// Reads a binary field as bytes
    pub fn bytes(&self, field: &str) -> Option<Vec<u8>> {
        value_to_bytes(self.get(field)?)
    }

    /// JSON view of the record: `id` plus writable fields only
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        if let Some(id) = &self.id {
            object.insert(PRIMARY_KEY.to_string(), Value::String(id.clone()));
        }
        for (field, value) in &self.fields {
            object.insert(field.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl From<Map<String, Value>> for GenericRecord {
    /// Splits a plain JSON object into primary key and fields
    fn from(mut object: Map<String, Value>) -> Self {
        let id = object.remove(PRIMARY_KEY).as_ref().and_then(id_string);
        Self {
            id,
            fields: object,
            derived: Map::new(),
        }
    }
}

/// Identifier value as a string; null means absent
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
