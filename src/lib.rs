//! docbridge - A query compiler and record codec for document stores
//!
//! Sits between a storage-agnostic data API and a MongoDB-style document
//! store: filters compile to query documents, records convert to and from
//! storage documents, and the adapter drives the four storage verbs.

pub mod adapter;
pub mod codec;
pub mod ident;
pub mod observability;
pub mod query;
pub mod schema;
pub mod store;

pub use adapter::{
    AdapterConfig, AdapterError, AdapterResult, FetchOptions, FetchResult, StorageAdapter, UpdateItem,
};
pub use codec::GenericRecord;
pub use query::Filter;
pub use schema::{FieldDefinition, RecordType, SchemaView, StorageType};
pub use store::{Document, DocumentStore, MemoryStore};
