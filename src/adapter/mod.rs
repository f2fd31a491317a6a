//! Storage adapter
//!
//! Exposes fetch, insert, mutate and remove over a [`DocumentStore`],
//! translating between generic records and storage documents with the
//! schema view.
//!
//! # Error classification
//!
//! - duplicate key on insert → `Conflict`
//! - unreadable binary on decode → `InvalidBinaryRepresentation`
//! - every other backend failure → `Backend`, unchanged
//!
//! No retries.
//!
//! [`DocumentStore`]: crate::store::DocumentStore

mod config;
mod errors;
mod options;
mod orchestrator;

pub use config::AdapterConfig;
pub use errors::{AdapterError, AdapterResult, DUPLICATE_KEY_MESSAGE};
pub use options::{FetchOptions, FetchResult, QueryHook, UpdateItem};
pub use orchestrator::StorageAdapter;
