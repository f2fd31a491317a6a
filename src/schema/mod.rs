//! Schema view
//!
//! Read-only, per-type field metadata consumed by the query compiler and
//! the record codec.
//!
//! # Design Principles
//!
//! - Built once before any operation runs, never mutated afterwards
//! - Explicit ordered field lists instead of runtime introspection
//! - Field names `id` and `_id` are reserved for identifiers

mod errors;
mod loader;
mod types;
mod view;

pub use errors::{SchemaError, SchemaResult};
pub use types::{FieldDefinition, RecordType, RecordTypeBuilder, StorageType, PRIMARY_KEY};
pub use view::SchemaView;
