//! Adapter metrics
//!
//! - Counters only
//! - Monotonic increase for the lifetime of the adapter
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one storage adapter
#[derive(Debug, Default)]
pub struct AdapterMetrics {
    /// Fetch calls that reached the backend
    fetches: AtomicU64,
    /// Records returned by fetch
    records_fetched: AtomicU64,
    /// Insert calls that reached the backend
    inserts: AtomicU64,
    /// Records stored by insert
    records_inserted: AtomicU64,
    /// Inserts rejected on a duplicate key
    conflicts: AtomicU64,
    /// Mutate calls
    mutations: AtomicU64,
    /// Documents modified by mutate
    records_mutated: AtomicU64,
    /// Remove calls that reached the backend
    removals: AtomicU64,
    /// Documents deleted by remove
    records_removed: AtomicU64,
    /// Calls answered without contacting the backend
    short_circuits: AtomicU64,
    /// Backend failures of any kind
    backend_errors: AtomicU64,
}

impl AdapterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, records: u64) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.records_fetched.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_insert(&self, records: u64) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.records_inserted.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_mutation(&self, records: u64) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
        self.records_mutated.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_removal(&self, records: u64) {
        self.removals.fetch_add(1, Ordering::Relaxed);
        self.records_removed.fetch_add(records, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_short_circuits(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_backend_errors(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches: self.fetches.load(Ordering::Relaxed),
            records_fetched: self.records_fetched.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            records_inserted: self.records_inserted.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            mutations: self.mutations.load(Ordering::Relaxed),
            records_mutated: self.records_mutated.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            records_removed: self.records_removed.load(Ordering::Relaxed),
            short_circuits: self.short_circuits.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object string
    pub fn to_json(&self) -> String {
        self.snapshot().to_json()
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fetches: u64,
    pub records_fetched: u64,
    pub inserts: u64,
    pub records_inserted: u64,
    pub conflicts: u64,
    pub mutations: u64,
    pub records_mutated: u64,
    pub removals: u64,
    pub records_removed: u64,
    pub short_circuits: u64,
    pub backend_errors: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_value(self)
            .map(|value| value.to_string())
            .unwrap_or_else(|_| "{}".to_string())
    }
}
