//! Record codec
//!
//! Converts between generic records and storage documents.
//!
//! # Invariants
//!
//! - Every encoded document has exactly one `_id`
//! - Encoded and decoded shapes are schema-complete: absent fields become
//!   `[]` (array fields) or null
//! - Decode fails only on an unreadable binary value
//! - `decode(encode(r))` is idempotent once the record has an id

mod binary;
mod convert;
mod errors;
mod record;

pub use binary::{bytes_to_value, normalize as normalize_binary, value_to_bytes};
pub use convert::{decode, encode};
pub use errors::{CodecError, CodecResult};
pub use record::GenericRecord;
