//! Storage adapter verbs
//!
//! fetch:  compile → query hook → id restriction → find ‖ count → decode
//! insert: encode → batch write → decode
//! mutate: one modifier document per item, all items in flight together
//! remove: delete by id membership, or the whole collection
//!
//! Empty id lists and empty inputs are answered without a backend call.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};

use super::config::AdapterConfig;
use super::errors::{AdapterError, AdapterResult};
use super::options::{FetchOptions, FetchResult, UpdateItem};
use crate::codec::{decode, encode, CodecError, GenericRecord};
use crate::ident::IdGenerator;
use crate::observability::{log_event_with_fields, AdapterMetrics, Event, Logger, Severity};
use crate::query::compile;
use crate::schema::{RecordType, SchemaView};
use crate::store::{Document, DocumentStore, StoreError, StoreResult, ID_KEY};

/// Schema-driven adapter over a document store
pub struct StorageAdapter {
    store: Arc<dyn DocumentStore>,
    schema: Arc<SchemaView>,
    ids: Arc<dyn IdGenerator>,
    config: AdapterConfig,
    metrics: AdapterMetrics,
}

impl StorageAdapter {
    /// Adapter with the default configuration
    pub fn new(store: Arc<dyn DocumentStore>, schema: impl Into<Arc<SchemaView>>) -> Self {
        Self::with_config(store, schema, AdapterConfig::default())
    }

    /// Adapter with an explicit configuration.
    ///
    /// A non-default `config.log_level` becomes the process-wide minimum
    /// severity; the default level leaves the current threshold alone.
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        schema: impl Into<Arc<SchemaView>>,
        config: AdapterConfig,
    ) -> Self {
        if config.log_level != Severity::default() {
            Logger::set_min_severity(config.log_level);
        }

        let schema = schema.into();
        let ids: Arc<dyn IdGenerator> = Arc::from(config.id_strategy.generator());
        let types = schema.len().to_string();
        log_event_with_fields(Event::AdapterReady, &[("types", types.as_str())]);

        Self {
            store,
            schema,
            ids,
            config,
            metrics: AdapterMetrics::new(),
        }
    }

    /// Replaces the identifier generator
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaView {
        &self.schema
    }

    pub fn metrics(&self) -> &AdapterMetrics {
        &self.metrics
    }

    /// Records of `record_type`, optionally restricted to `ids`, plus the
    /// total number of matches.
    pub async fn fetch(
        &self,
        record_type: &str,
        ids: Option<&[String]>,
        options: &FetchOptions,
    ) -> AdapterResult<FetchResult> {
        let definition = self.record_type(record_type)?;
        if matches!(ids, Some(ids) if ids.is_empty()) {
            self.metrics.increment_short_circuits();
            return Ok(FetchResult::empty());
        }

        let collection = self.config.collection_for(record_type);
        let mut query = compile(definition, &options.filter);
        if let Some(hook) = &options.query {
            if let Some(replacement) = hook(&query) {
                query = replacement;
            }
        }
        if let Some(ids) = ids {
            query = restrict_to_ids(query, ids);
        }

        let find_options = options.find_options();
        let (documents, count) = tokio::try_join!(
            self.store.find(collection, &query, &find_options),
            self.store.count(collection, &query),
        )
        .map_err(|e| self.backend_failure("fetch", record_type, e))?;

        let records = self.decode_all(definition, &documents)?;
        self.metrics.record_fetch(records.len() as u64);

        let returned = records.len().to_string();
        let total = count.to_string();
        log_event_with_fields(
            Event::FetchComplete,
            &[
                ("type", record_type),
                ("collection", collection),
                ("records", returned.as_str()),
                ("count", total.as_str()),
            ],
        );

        Ok(FetchResult { records, count })
    }

    /// Stores `records` in one batch and returns them as stored.
    ///
    /// Fails with `Conflict` if any id is already taken.
    pub async fn insert(
        &self,
        record_type: &str,
        records: &[GenericRecord],
    ) -> AdapterResult<Vec<GenericRecord>> {
        let definition = self.record_type(record_type)?;
        if records.is_empty() {
            self.metrics.increment_short_circuits();
            return Ok(Vec::new());
        }

        let collection = self.config.collection_for(record_type);
        let documents: Vec<Document> = records
            .iter()
            .map(|record| encode(definition, record, self.ids.as_ref()))
            .collect();

        let stored = match self.store.insert_many(collection, documents).await {
            Ok(stored) => stored,
            Err(e) if e.is_duplicate_key() => {
                self.metrics.increment_conflicts();
                log_event_with_fields(
                    Event::InsertConflict,
                    &[("type", record_type), ("collection", collection), ("error", e.message())],
                );
                return Err(AdapterError::duplicate_key());
            }
            Err(e) => return Err(self.backend_failure("insert", record_type, e)),
        };

        let inserted = self.decode_all(definition, &stored)?;
        self.metrics.record_insert(inserted.len() as u64);

        let count = inserted.len().to_string();
        log_event_with_fields(
            Event::InsertComplete,
            &[("type", record_type), ("collection", collection), ("count", count.as_str())],
        );

        Ok(inserted)
    }

    /// Applies every update item and returns the number of records matched.
    ///
    /// Items run concurrently. If any fails, the first failure in input
    /// order is returned; items that already succeeded stay applied.
    pub async fn mutate(&self, record_type: &str, updates: &[UpdateItem]) -> AdapterResult<u64> {
        self.record_type(record_type)?;
        let collection = self.config.collection_for(record_type);

        let outcomes = join_all(
            updates
                .iter()
                .map(|item| self.apply_update(collection, item)),
        )
        .await;

        let mut matched = 0;
        for outcome in outcomes {
            matched += outcome.map_err(|e| self.backend_failure("mutate", record_type, e))?;
        }
        self.metrics.record_mutation(matched);

        let count = matched.to_string();
        log_event_with_fields(
            Event::MutateComplete,
            &[("type", record_type), ("collection", collection), ("count", count.as_str())],
        );

        Ok(matched)
    }

    /// Deletes the records with the given ids, or every record of the
    /// type when `ids` is `None`. Returns the number deleted.
    pub async fn remove(&self, record_type: &str, ids: Option<&[String]>) -> AdapterResult<u64> {
        self.record_type(record_type)?;
        if matches!(ids, Some(ids) if ids.is_empty()) {
            self.metrics.increment_short_circuits();
            return Ok(0);
        }

        let collection = self.config.collection_for(record_type);
        let filter = match ids {
            Some(ids) => restrict_to_ids(Document::new(), ids),
            None => Document::new(),
        };

        let removed = self
            .store
            .delete_many(collection, &filter)
            .await
            .map_err(|e| self.backend_failure("remove", record_type, e))?;
        self.metrics.record_removal(removed);

        let count = removed.to_string();
        log_event_with_fields(
            Event::RemoveComplete,
            &[("type", record_type), ("collection", collection), ("count", count.as_str())],
        );

        Ok(removed)
    }

    fn record_type(&self, name: &str) -> AdapterResult<&RecordType> {
        self.schema
            .fields_of(name)
            .ok_or_else(|| AdapterError::UnknownType(name.to_string()))
    }

    async fn apply_update(&self, collection: &str, item: &UpdateItem) -> StoreResult<u64> {
        let modifiers = item.modifiers();
        if modifiers.is_empty() {
            self.metrics.increment_short_circuits();
            return Ok(0);
        }

        let mut filter = Document::new();
        filter.insert(ID_KEY.to_string(), Value::String(item.id.clone()));
        self.store.update_one(collection, &filter, &modifiers).await
    }

    fn decode_all(
        &self,
        definition: &RecordType,
        documents: &[Document],
    ) -> AdapterResult<Vec<GenericRecord>> {
        documents
            .iter()
            .map(|document| decode(definition, document))
            .collect::<Result<Vec<_>, CodecError>>()
            .map_err(|e| {
                let CodecError::InvalidBinaryRepresentation { field, found } = &e;
                log_event_with_fields(
                    Event::BinaryDecodeFailed,
                    &[("type", definition.name()), ("field", field.as_str()), ("found", found.as_str())],
                );
                AdapterError::from(e)
            })
    }

    fn backend_failure(&self, operation: &str, record_type: &str, error: StoreError) -> AdapterError {
        self.metrics.increment_backend_errors();
        log_event_with_fields(
            Event::BackendFailure,
            &[("operation", operation), ("type", record_type), ("error", error.message())],
        );
        AdapterError::Backend(error)
    }
}

/// Adds `_id ∈ ids` to `query`, keeping any existing `_id` constraint
fn restrict_to_ids(mut query: Document, ids: &[String]) -> Document {
    let mut membership = Map::new();
    membership.insert(
        "$in".to_string(),
        Value::Array(ids.iter().cloned().map(Value::String).collect()),
    );
    let membership = Value::Object(membership);

    if !query.contains_key(ID_KEY) {
        query.insert(ID_KEY.to_string(), membership);
        return query;
    }

    let mut restriction = Document::new();
    restriction.insert(ID_KEY.to_string(), membership);

    let mut combined = Document::new();
    combined.insert(
        "$and".to_string(),
        Value::Array(vec![Value::Object(query), Value::Object(restriction)]),
    );
    combined
}
