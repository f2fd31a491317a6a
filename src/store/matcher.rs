//! Query document evaluation
//!
//! Evaluates the subset of the MongoDB query language the compiler emits:
//! `$and`, `$or`, `$nor`, `$not`, `$eq`, `$ne`, `$in`, `$nin`, `$gt`,
//! `$gte`, `$lt`, `$lte`, `$exists`, dotted paths with array indices, and
//! array-contains equality.
//!
//! No type coercion: a range bound only compares against values of the
//! same kind (number with number, string with string).

use std::cmp::Ordering;

use serde_json::Value;

use super::backend::Document;

/// Evaluates query documents against storage documents
pub struct QueryMatcher;

impl QueryMatcher {
    /// Checks if a document matches every clause of `query`
    pub fn matches(document: &Document, query: &Document) -> bool {
        query.iter().all(|(key, condition)| match key.as_str() {
            "$and" => Self::subqueries(condition).all(|q| Self::matches(document, q)),
            "$or" => Self::subqueries(condition).any(|q| Self::matches(document, q)),
            "$nor" => !Self::subqueries(condition).any(|q| Self::matches(document, q)),
            path => Self::matches_condition(Self::resolve(document, path), condition),
        })
    }

    /// Checks a single resolved value against a field condition
    ///
    /// A condition is either an operator document (`{"$gte": 1}`) or a
    /// literal compared for equality.
    pub fn matches_condition(actual: Option<&Value>, condition: &Value) -> bool {
        match Self::operators(condition) {
            Some(ops) => ops
                .iter()
                .all(|(op, operand)| Self::matches_operator(actual, op, operand)),
            None => Self::eq_match(actual, condition),
        }
    }

    /// Resolves a dotted path, indexing into arrays by position
    pub fn resolve<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let mut current = document.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn subqueries(condition: &Value) -> impl Iterator<Item = &Document> {
        condition
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    /// Returns the operator map if every key of `condition` is an operator
    fn operators(condition: &Value) -> Option<&Document> {
        match condition {
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => {
                Some(map)
            }
            _ => None,
        }
    }

    fn matches_operator(actual: Option<&Value>, op: &str, operand: &Value) -> bool {
        match op {
            "$eq" => Self::eq_match(actual, operand),
            "$ne" => !Self::eq_match(actual, operand),
            "$in" => Self::in_match(actual, operand),
            "$nin" => !Self::in_match(actual, operand),
            "$gt" => Self::range_match(actual, operand, |o| o == Ordering::Greater),
            "$gte" => Self::range_match(actual, operand, |o| o != Ordering::Less),
            "$lt" => Self::range_match(actual, operand, |o| o == Ordering::Less),
            "$lte" => Self::range_match(actual, operand, |o| o != Ordering::Greater),
            "$exists" => actual.is_some() == Self::truthy(operand),
            "$not" => !Self::matches_condition(actual, operand),
            _ => false,
        }
    }

    /// Equality with MongoDB semantics
    ///
    /// - `null` matches null or a missing field
    /// - an array field matches if it equals the value or contains it
    fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
        match actual {
            None => expected.is_null(),
            Some(value) if value == expected => true,
            Some(Value::Array(items)) => items.contains(expected),
            Some(_) => false,
        }
    }

    fn in_match(actual: Option<&Value>, operand: &Value) -> bool {
        operand
            .as_array()
            .map_or(false, |candidates| {
                candidates.iter().any(|c| Self::eq_match(actual, c))
            })
    }

    fn range_match(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
        match actual {
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| Self::compare(item, bound).map_or(false, &accept)),
            Some(value) => Self::compare(value, bound).map_or(false, accept),
            None => false,
        }
    }

    /// Compares values of the same kind; mixed kinds are incomparable
    fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
            Value::Null => false,
            _ => true,
        }
    }
}
