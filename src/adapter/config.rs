//! Adapter configuration
//!
//! ```json
//! {
//!   "type_map": { "user": "people" },
//!   "id_strategy": "uuid",
//!   "log_level": "INFO"
//! }
//! ```
//!
//! Every key is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{AdapterError, AdapterResult};
use crate::ident::IdStrategy;
use crate::observability::Severity;

/// Storage adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Collection name per type; unlisted types use their own name
    #[serde(default)]
    pub type_map: BTreeMap<String, String>,

    /// Built-in identifier generator (default: random)
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Minimum log severity (default: WARN).
    ///
    /// The threshold is process-wide. Only a non-default level is applied
    /// when an adapter is constructed, so a default adapter never lowers
    /// or raises a level set by another one.
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            type_map: BTreeMap::new(),
            id_strategy: IdStrategy::default(),
            log_level: default_log_level(),
        }
    }
}

impl AdapterConfig {
    /// Builder-style collection override
    pub fn with_collection(mut self, record_type: impl Into<String>, collection: impl Into<String>) -> Self {
        self.type_map.insert(record_type.into(), collection.into());
        self
    }

    /// Backend collection holding records of `record_type`
    pub fn collection_for<'a>(&'a self, record_type: &'a str) -> &'a str {
        self.type_map
            .get(record_type)
            .map(String::as_str)
            .unwrap_or(record_type)
    }

    pub fn from_json_str(content: &str) -> AdapterResult<Self> {
        Self::parse(content, "<in-memory>")
    }

    pub fn from_file(path: &Path) -> AdapterResult<Self> {
        let location = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            AdapterError::invalid_config(&location, format!("Failed to read file: {}", e))
        })?;
        Self::parse(&content, &location)
    }

    fn parse(content: &str, location: &str) -> AdapterResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AdapterError::invalid_config(location, format!("Invalid JSON: {}", e)))
    }
}
