//! Document store boundary
//!
//! Defines the backend trait the adapter drives and an in-memory backend
//! that evaluates compiled queries.
//!
//! # Backend contract
//!
//! - find with projection, sort, skip and limit
//! - count over the same query form
//! - batch insert with a distinguishable duplicate-key failure
//! - single-document update by filter, multi-document delete

mod backend;
mod errors;
mod matcher;
mod memory;
mod modifier;
mod sorter;

pub use backend::{
    Document, DocumentStore, FindOptions, SortDirection, SortSpec, StoreFuture, ID_KEY,
};
pub use errors::{StoreError, StoreResult, DUPLICATE_KEY_CODE};
pub use matcher::QueryMatcher;
pub use memory::MemoryStore;
pub use modifier::{ModifierApplier, BAD_MODIFIER_CODE};
pub use sorter::{project, DocumentSorter};
