//! Record ↔ storage document conversion
//!
//! encode:
//! 1. Primary key: the record's non-empty id, else a generated one, stored
//!    under `_id`
//! 2. Supplied fields copied verbatim
//! 3. Schema fields missing from the input materialized as `[]` or null
//!
//! decode:
//! 1. `_id` back to the record id
//! 2. Schema fields missing from the document materialized the same way;
//!    binary fields normalized to raw bytes
//! 3. Denormalized fields placed in `derived`
//!
//! Keys outside the schema are not carried into decoded records.

use serde_json::Value;

use super::binary::normalize;
use super::errors::{CodecError, CodecResult};
use super::record::{id_string, GenericRecord};
use crate::ident::IdGenerator;
use crate::schema::{FieldDefinition, RecordType, PRIMARY_KEY};
use crate::store::{Document, ID_KEY};

/// Converts a generic record into a schema-complete storage document.
pub fn encode(record_type: &RecordType, record: &GenericRecord, ids: &dyn IdGenerator) -> Document {
    let id = record
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| {
            record
                .fields
                .get(PRIMARY_KEY)
                .and_then(id_string)
                .filter(|id| !id.is_empty())
        })
        .unwrap_or_else(|| ids.generate(record_type.name()));

    let mut document = Document::new();
    document.insert(ID_KEY.to_string(), Value::String(id));

    for (field, value) in &record.fields {
        if field == PRIMARY_KEY || field == ID_KEY {
            continue;
        }
        document.insert(field.clone(), value.clone());
    }

    for definition in record_type.fields() {
        if !record.fields.contains_key(&definition.name) {
            document.insert(definition.name.clone(), definition.default_value());
        }
    }

    document
}

/// Converts a storage document back into a generic record.
pub fn decode(record_type: &RecordType, document: &Document) -> CodecResult<GenericRecord> {
    let mut record = GenericRecord {
        id: document.get(ID_KEY).and_then(id_string),
        ..GenericRecord::default()
    };

    for definition in record_type.fields() {
        let value = match document.get(&definition.name) {
            Some(stored) if definition.is_binary() => decode_binary(definition, stored)?,
            Some(stored) => stored.clone(),
            None => definition.default_value(),
        };

        let target = if definition.is_denormalized {
            &mut record.derived
        } else {
            &mut record.fields
        };
        target.insert(definition.name.clone(), value);
    }

    Ok(record)
}

fn decode_binary(definition: &FieldDefinition, stored: &Value) -> CodecResult<Value> {
    if !definition.is_array {
        return normalize(&definition.name, stored);
    }

    match stored {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => items
            .iter()
            .map(|item| normalize(&definition.name, item))
            .collect::<CodecResult<Vec<Value>>>()
            .map(Value::Array),
        _ => Err(CodecError::invalid_binary(
            &definition.name,
            "non-array value for array field",
        )),
    }
}
