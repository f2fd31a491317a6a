//! Inputs and outputs of the adapter verbs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::GenericRecord;
use crate::query::Filter;
use crate::store::{Document, FindOptions, SortSpec};

/// Caller hook over the compiled query; `None` keeps the query unchanged
pub type QueryHook = Arc<dyn Fn(&Document) -> Option<Document> + Send + Sync>;

/// Options of a fetch
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Record-level filter, compiled against the type's schema
    pub filter: Filter,
    /// Sort keys, most significant first
    pub sort: Vec<SortSpec>,
    /// Projection: field → include
    pub fields: BTreeMap<String, bool>,
    /// Records to skip; page fetch only
    pub offset: Option<u64>,
    /// Maximum records returned; page fetch only
    pub limit: Option<u64>,
    pub query: Option<QueryHook>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort.push(spec);
        self
    }

    pub fn field(mut self, field: impl Into<String>, include: bool) -> Self {
        self.fields.insert(field.into(), include);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Document) -> Option<Document> + Send + Sync + 'static,
    {
        self.query = Some(Arc::new(hook));
        self
    }

    /// Backend options for the page fetch
    pub(crate) fn find_options(&self) -> FindOptions {
        let projection = self
            .fields
            .iter()
            .map(|(field, include)| (field.clone(), Value::from(if *include { 1 } else { 0 })))
            .collect();

        FindOptions {
            projection,
            sort: self.sort.clone(),
            skip: self.offset,
            limit: self.limit,
        }
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("fields", &self.fields)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("query", &self.query.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Records of one fetch plus the total number of matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    pub records: Vec<GenericRecord>,
    /// Matches ignoring offset and limit
    pub count: u64,
}

impl FetchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One update to a single record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateItem {
    /// Target record's id
    pub id: String,
    /// Fields overwritten wholesale
    pub replace: Map<String, Value>,
    /// Values appended to array fields; arrays append every element
    pub push: Map<String, Value>,
    /// Values removed from array fields; arrays remove every element
    pub pull: Map<String, Value>,
    /// Raw backend operators, merged last
    pub operate: Document,
}

impl UpdateItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn replace(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.replace.insert(field.into(), value.into());
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push.insert(field.into(), value.into());
        self
    }

    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pull.insert(field.into(), value.into());
        self
    }

    pub fn operate(mut self, operator: impl Into<String>, argument: impl Into<Value>) -> Self {
        self.operate.insert(operator.into(), argument.into());
        self
    }

    /// Backend modifier document for this item; empty means no-op
    pub fn modifiers(&self) -> Document {
        let mut modifiers = Document::new();

        if !self.replace.is_empty() {
            modifiers.insert("$set".to_string(), Value::Object(self.replace.clone()));
        }
        if !self.push.is_empty() {
            modifiers.insert("$push".to_string(), wrap_sequences(&self.push, "$each"));
        }
        if !self.pull.is_empty() {
            modifiers.insert("$pull".to_string(), wrap_sequences(&self.pull, "$in"));
        }

        for (operator, argument) in &self.operate {
            modifiers.insert(operator.clone(), argument.clone());
        }

        modifiers
    }
}

fn wrap_sequences(values: &Map<String, Value>, operator: &str) -> Value {
    let wrapped = values
        .iter()
        .map(|(field, value)| {
            let value = match value {
                Value::Array(_) => {
                    let mut inner = Map::new();
                    inner.insert(operator.to_string(), value.clone());
                    Value::Object(inner)
                }
                other => other.clone(),
            };
            (field.clone(), value)
        })
        .collect();
    Value::Object(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_item_has_no_modifiers() {
        assert!(UpdateItem::new("1").modifiers().is_empty());
    }

    #[test]
    fn test_modifiers_wrap_sequences() {
        let item = UpdateItem::new("1")
            .replace("name", "Bob")
            .push("tags", json!(["a", "b"]))
            .push("scores", 3)
            .pull("tags", json!(["c"]))
            .pull("scores", 1);

        assert_eq!(
            Value::Object(item.modifiers()),
            json!({
                "$set": {"name": "Bob"},
                "$push": {"tags": {"$each": ["a", "b"]}, "scores": 3},
                "$pull": {"tags": {"$in": ["c"]}, "scores": 1}
            })
        );
    }

    #[test]
    fn test_operate_wins_on_overlap() {
        let item = UpdateItem::new("1")
            .replace("name", "Bob")
            .operate("$set", json!({"name": "Carol"}))
            .operate("$inc", json!({"visits": 1}));

        assert_eq!(
            Value::Object(item.modifiers()),
            json!({"$set": {"name": "Carol"}, "$inc": {"visits": 1}})
        );
    }

    #[test]
    fn test_find_options_from_fetch_options() {
        let options = FetchOptions::new()
            .field("name", true)
            .field("secret", false)
            .sort(SortSpec::desc("age"))
            .offset(5)
            .limit(10);

        let find = options.find_options();
        assert_eq!(Value::Object(find.projection), json!({"name": 1, "secret": 0}));
        assert_eq!(find.sort, vec![SortSpec::desc("age")]);
        assert_eq!(find.skip, Some(5));
        assert_eq!(find.limit, Some(10));
    }

    #[test]
    fn test_debug_hides_hook() {
        let options = FetchOptions::new().query_hook(|_| None);
        assert!(format!("{:?}", options).contains("<hook>"));
    }
}
