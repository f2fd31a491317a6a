//! Result sorting and projection for the in-memory store
//!
//! Sorting is stable and deterministic across mixed value kinds.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::backend::{Document, SortDirection, SortSpec, ID_KEY};
use super::matcher::QueryMatcher;

/// Sorts documents by a list of sort keys
pub struct DocumentSorter;

impl DocumentSorter {
    /// Sorts documents in place; earlier keys take precedence.
    pub fn sort(documents: &mut [Document], keys: &[SortSpec]) {
        if keys.is_empty() {
            return;
        }

        documents.sort_by(|a, b| {
            for key in keys {
                let ordering = Self::compare_values(
                    QueryMatcher::resolve(a, &key.field),
                    QueryMatcher::resolve(b, &key.field),
                );
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Sort order across kinds: missing, null, bool, number, string,
    /// array, object. Arrays and objects tie with their own kind.
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => return a.is_some().cmp(&b.is_some()),
        };

        kind_rank(a).cmp(&kind_rank(b)).then_with(|| match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        })
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Exact for integers; falls back to f64 for mixed or fractional numbers
fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x.cmp(&y);
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Applies a projection document to a stored document.
///
/// If any non-`_id` field is included the projection is an inclusion
/// list (`_id` stays unless excluded explicitly); otherwise listed fields
/// are excluded.
pub fn project(document: &Document, projection: &Document) -> Document {
    if projection.is_empty() {
        return document.clone();
    }

    let included = |value: &Value| match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        _ => true,
    };

    let inclusive = projection
        .iter()
        .any(|(field, value)| field != ID_KEY && included(value));

    if inclusive {
        let keep_id = projection.get(ID_KEY).map_or(true, |v| included(v));
        document
            .iter()
            .filter(|(field, _)| {
                if field.as_str() == ID_KEY {
                    keep_id
                } else {
                    projection.get(field.as_str()).map_or(false, |v| included(v))
                }
            })
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    } else {
        document
            .iter()
            .filter(|(field, _)| projection.get(field.as_str()).map_or(true, |v| included(v)))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}
