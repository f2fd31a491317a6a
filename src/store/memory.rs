//! In-memory document store
//!
//! A complete [`DocumentStore`] over per-collection document lists, kept in
//! insertion order. Enforces `_id` uniqueness and evaluates compiled
//! queries with [`QueryMatcher`]. Every trait call is counted so callers
//! can assert that short-circuited operations never reached the backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use super::backend::{Document, DocumentStore, FindOptions, StoreFuture, ID_KEY};
use super::errors::StoreError;
use super::matcher::QueryMatcher;
use super::modifier::ModifierApplier;
use super::sorter::{project, DocumentSorter};

/// Documents per collection, in insertion order
type Collections = HashMap<String, Vec<Document>>;

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls served so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Copy of a collection's documents, without counting as a call
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn duplicate_key(collection: &str, id: &Value) -> StoreError {
        StoreError::duplicate_key(format!(
            "E11000 duplicate key error collection: {} index: _id_ dup key: {{ _id: {} }}",
            collection, id
        ))
    }
}

impl DocumentStore for MemoryStore {
    fn find<'a>(
        &'a self,
        collection: &'a str,
        query: &'a Document,
        options: &'a FindOptions,
    ) -> StoreFuture<'a, Vec<Document>> {
        self.record_call();
        Box::pin(async move {
            let collections = self.collections.read().await;

            let mut matched: Vec<Document> = collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| QueryMatcher::matches(doc, query))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            drop(collections);

            DocumentSorter::sort(&mut matched, &options.sort);

            let skip = options.skip.unwrap_or(0) as usize;
            let limit = options.limit.map_or(usize::MAX, |l| l as usize);

            Ok(matched
                .iter()
                .skip(skip)
                .take(limit)
                .map(|doc| project(doc, &options.projection))
                .collect())
        })
    }

    fn count<'a>(&'a self, collection: &'a str, query: &'a Document) -> StoreFuture<'a, u64> {
        self.record_call();
        Box::pin(async move {
            let collections = self.collections.read().await;

            Ok(collections.get(collection).map_or(0, |docs| {
                docs.iter()
                    .filter(|doc| QueryMatcher::matches(doc, query))
                    .count() as u64
            }))
        })
    }

    fn insert_many<'a>(
        &'a self,
        collection: &'a str,
        documents: Vec<Document>,
    ) -> StoreFuture<'a, Vec<Document>> {
        self.record_call();
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let existing = collections.entry(collection.to_string()).or_default();

            let mut inserted = Vec::with_capacity(documents.len());
            for mut document in documents {
                let id = document
                    .entry(ID_KEY.to_string())
                    .or_insert_with(|| Value::String(uuid::Uuid::new_v4().simple().to_string()))
                    .clone();

                let taken = existing
                    .iter()
                    .chain(inserted.iter())
                    .any(|doc: &Document| doc.get(ID_KEY) == Some(&id));
                if taken {
                    return Err(Self::duplicate_key(collection, &id));
                }
                inserted.push(document);
            }

            existing.extend(inserted.iter().cloned());
            Ok(inserted)
        })
    }

    fn update_one<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Document,
        modifiers: &'a Document,
    ) -> StoreFuture<'a, u64> {
        self.record_call();
        Box::pin(async move {
            let mut collections = self.collections.write().await;

            let target = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|doc| QueryMatcher::matches(doc, filter)));

            match target {
                Some(document) => {
                    ModifierApplier::apply(document, modifiers)?;
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    fn delete_many<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Document,
    ) -> StoreFuture<'a, u64> {
        self.record_call();
        Box::pin(async move {
            let mut collections = self.collections.write().await;

            let Some(docs) = collections.get_mut(collection) else {
                return Ok(0);
            };

            let before = docs.len();
            docs.retain(|doc| !QueryMatcher::matches(doc, filter));
            Ok((before - docs.len()) as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::store::SortSpec;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_many(
                "users",
                vec![
                    doc(json!({"_id": "a", "name": "Alice", "age": 30, "tags": ["x"]})),
                    doc(json!({"_id": "b", "name": "Bob", "age": 20, "tags": []})),
                    doc(json!({"_id": "c", "name": "Carol", "age": 40, "tags": ["x", "y"]})),
                ],
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_find_with_query_sort_and_page() {
        let store = seeded().await;
        let query = doc(json!({"tags": "x"}));
        let options = FindOptions {
            sort: vec![SortSpec::desc("age")],
            limit: Some(1),
            ..Default::default()
        };

        let found = store.find("users", &query, &options).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_id"], "c");

        let count = store.count("users", &query).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_find_skip_past_end() {
        let store = seeded().await;
        let options = FindOptions {
            skip: Some(10),
            ..Default::default()
        };

        let found = store.find("users", &Document::new(), &options).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = seeded().await;

        let err = store
            .insert_many("users", vec![doc(json!({"_id": "a", "name": "Again"}))])
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.documents("users").await.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_rejected() {
        let store = MemoryStore::new();

        let err = store
            .insert_many(
                "users",
                vec![doc(json!({"_id": "z"})), doc(json!({"_id": "z"}))],
            )
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert!(store.documents("users").await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_missing_id() {
        let store = MemoryStore::new();

        let inserted = store
            .insert_many("users", vec![doc(json!({"name": "NoId"}))])
            .await
            .unwrap();
        assert!(inserted[0][ID_KEY].is_string());
    }

    #[tokio::test]
    async fn test_update_one_matches_by_id() {
        let store = seeded().await;

        let updated = store
            .update_one(
                "users",
                &doc(json!({"_id": "b"})),
                &doc(json!({"$set": {"age": 21}})),
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let missing = store
            .update_one(
                "users",
                &doc(json!({"_id": "nobody"})),
                &doc(json!({"$set": {"age": 1}})),
            )
            .await
            .unwrap();
        assert_eq!(missing, 0);

        let docs = store.documents("users").await;
        assert_eq!(docs[1]["age"], 21);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let store = seeded().await;

        let removed = store
            .delete_many("users", &doc(json!({"_id": {"$in": ["a", "c"]}})))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let removed = store.delete_many("users", &Document::new()).await.unwrap();
        assert_eq!(removed, 1);

        let removed = store.delete_many("ghosts", &Document::new()).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_call_counting() {
        let store = MemoryStore::new();
        assert_eq!(store.call_count(), 0);

        store.count("users", &Document::new()).await.unwrap();
        store.documents("users").await;
        assert_eq!(store.call_count(), 1);
    }
}
