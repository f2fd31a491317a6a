//! Document store seam
//!
//! The adapter drives any backend implementing [`DocumentStore`]. Queries,
//! projections and modifiers cross this boundary as MongoDB-style
//! documents.

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use super::errors::StoreResult;

/// Backend-native document
pub type Document = Map<String, Value>;

/// Internal identifier key of every storage document
pub const ID_KEY: &str = "_id";

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Backend representation: 1 ascending, -1 descending
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Options applied to a find, never to a count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Field → 1 (include) or 0 (exclude); empty means whole documents
    pub projection: Document,
    /// Sort keys, most significant first
    pub sort: Vec<SortSpec>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Backend document store
pub trait DocumentStore: Send + Sync {
    /// Documents matching `query`, shaped by `options`
    fn find<'a>(
        &'a self,
        collection: &'a str,
        query: &'a Document,
        options: &'a FindOptions,
    ) -> StoreFuture<'a, Vec<Document>>;

    /// Number of documents matching `query`
    fn count<'a>(&'a self, collection: &'a str, query: &'a Document) -> StoreFuture<'a, u64>;

    /// Insert a batch, returning the stored documents
    ///
    /// Fails with a duplicate-key error if any `_id` already exists.
    fn insert_many<'a>(
        &'a self,
        collection: &'a str,
        documents: Vec<Document>,
    ) -> StoreFuture<'a, Vec<Document>>;

    /// Apply `modifiers` to the first document matching `filter`,
    /// returning the number of documents matched (0 or 1)
    fn update_one<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Document,
        modifiers: &'a Document,
    ) -> StoreFuture<'a, u64>;

    /// Delete every document matching `filter`, returning how many were removed
    fn delete_many<'a>(&'a self, collection: &'a str, filter: &'a Document)
        -> StoreFuture<'a, u64>;
}
