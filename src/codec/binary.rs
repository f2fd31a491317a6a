//! Binary value normalization
//!
//! Records expose bytes in one canonical form: a JSON array of integers in
//! `0..=255`. Stored documents may hold that raw form or a wrapper around
//! an inner buffer:
//!
//! - `{"$binary": {"base64": "...", "subType": "00"}}` (extended JSON)
//! - `{"$binary": "...", "$type": "00"}` (legacy extended JSON)
//! - `{"buffer": [..raw bytes..]}`

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use super::errors::{CodecError, CodecResult};

/// Canonical JSON form of a byte string
pub fn bytes_to_value(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|&b| Value::from(b)).collect())
}

/// Reads the canonical raw form back into bytes
pub fn value_to_bytes(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

/// Normalizes one stored binary value to canonical raw form.
///
/// Null stays null.
pub fn normalize(field: &str, value: &Value) -> CodecResult<Value> {
    if value.is_null() || value_to_bytes(value).is_some() {
        return Ok(value.clone());
    }

    unwrap_buffer(value)
        .map(|bytes| bytes_to_value(&bytes))
        .ok_or_else(|| CodecError::invalid_binary(field, describe(value)))
}

fn unwrap_buffer(value: &Value) -> Option<Vec<u8>> {
    let wrapper = value.as_object()?;

    if let Some(binary) = wrapper.get("$binary") {
        let encoded = match binary {
            Value::Object(inner) => inner.get("base64")?.as_str()?,
            Value::String(encoded) => encoded.as_str(),
            _ => return None,
        };
        return STANDARD.decode(encoded).ok();
    }

    value_to_bytes(wrapper.get("buffer")?)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "non-byte array",
        Value::Object(_) => "object without buffer",
    }
}
