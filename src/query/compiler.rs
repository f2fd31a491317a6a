//! Filter compilation
//!
//! Translates a [`Filter`] into a MongoDB-style query document.
//!
//! # Translation
//!
//! | Filter                    | Scalar field                        | Array field                       |
//! |---------------------------|-------------------------------------|-----------------------------------|
//! | `match(f, v)`             | `{f: v}`                            | same                              |
//! | `match(f, [a, b])`        | `{f: {$in: [a, b]}}`                | same                              |
//! | `exists(f, true)`         | `{f: {$ne: null}}`                  | `{f: {$ne: []}}`                  |
//! | `exists(f, false)`        | `{f: null}`                         | `{f: []}`                         |
//! | `range(f, [lo, hi])`      | `{f: {$ne: null, $gte: lo, $lte: hi}}` | `{f.<lo-1>: {$exists: true}, f.<hi>: {$exists: false}}` |
//!
//! Array ranges address length: element `lo-1` existing means at least
//! `lo` elements, element `hi` missing means at most `hi`.
//!
//! # Negation
//!
//! `not` compiles its child unnegated and then wraps each top-level clause
//! once. A field clause has every field wrapped in `$not`; a boolean
//! clause (`$or`, ...) is wrapped in `$nor`. Negation is not pushed
//! through nested combinators, so `not(and(A, B))` compiles to
//! `and(not A, not B)`.
//!
//! Compilation is pure: the same filter and record type always produce
//! the same document.

use serde_json::{json, Map, Value};

use super::filter::{Filter, MatchValue, RangeBounds};
use crate::schema::RecordType;
use crate::store::Document;

/// Compiles `filter` against the fields of `record_type`.
pub fn compile(record_type: &RecordType, filter: &Filter) -> Document {
    assemble(clauses(record_type, filter))
}

/// Top-level conjuncts produced by a filter node
fn clauses(record_type: &RecordType, filter: &Filter) -> Vec<Document> {
    match filter {
        Filter::Match(fields) => non_empty(match_clause(fields.iter())),
        Filter::Exists(fields) => non_empty(exists_clause(record_type, fields.iter())),
        Filter::Range(fields) => non_empty(range_clause(record_type, fields.iter())),
        Filter::And(children) => children
            .iter()
            .flat_map(|child| clauses(record_type, child))
            .collect(),
        Filter::Or(children) => {
            if children.is_empty() {
                return Vec::new();
            }
            let branches: Vec<Value> = children
                .iter()
                .map(|child| Value::Object(compile(record_type, child)))
                .collect();
            vec![single("$or", Value::Array(branches))]
        }
        Filter::Not(child) => clauses(record_type, child)
            .into_iter()
            .map(negate)
            .collect(),
    }
}

fn match_clause<'a>(fields: impl Iterator<Item = (&'a String, &'a MatchValue)>) -> Document {
    fields
        .map(|(field, value)| {
            let condition = match value {
                MatchValue::AnyOf(values) => json!({ "$in": values }),
                MatchValue::Is(value) => value.clone(),
            };
            (field.clone(), condition)
        })
        .collect()
}

fn exists_clause<'a>(
    record_type: &RecordType,
    fields: impl Iterator<Item = (&'a String, &'a bool)>,
) -> Document {
    fields
        .filter_map(|(field, &present)| {
            let definition = record_type.field(field)?;
            let empty = definition.default_value();
            let condition = if present {
                json!({ "$ne": empty })
            } else {
                empty
            };
            Some((field.clone(), condition))
        })
        .collect()
}

fn range_clause<'a>(
    record_type: &RecordType,
    fields: impl Iterator<Item = (&'a String, &'a RangeBounds)>,
) -> Document {
    let mut clause = Document::new();

    for (field, bounds) in fields {
        let Some(definition) = record_type.field(field) else {
            continue;
        };

        if definition.is_array {
            if let Some(low) = bounds.low().and_then(array_bound).filter(|&n| n > 0) {
                clause.insert(format!("{}.{}", field, low - 1), json!({ "$exists": true }));
            }
            if let Some(high) = bounds.high().and_then(array_bound) {
                clause.insert(format!("{}.{}", field, high), json!({ "$exists": false }));
            }
            continue;
        }

        let mut condition = Map::new();
        condition.insert("$ne".to_string(), Value::Null);
        if let Some(low) = bounds.low() {
            condition.insert("$gte".to_string(), low.clone());
        }
        if let Some(high) = bounds.high() {
            condition.insert("$lte".to_string(), high.clone());
        }
        clause.insert(field.clone(), Value::Object(condition));
    }

    clause
}

/// Array length bound: a non-negative whole number, integer or float
fn array_bound(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Wraps one top-level clause in a negation
fn negate(clause: Document) -> Document {
    if clause.keys().any(|key| key.starts_with('$')) {
        return single("$nor", Value::Array(vec![Value::Object(clause)]));
    }

    clause
        .into_iter()
        .map(|(field, condition)| (field, json!({ "$not": condition })))
        .collect()
}

/// Zero clauses match everything; one passes through; more are conjoined
fn assemble(mut clauses: Vec<Document>) -> Document {
    match clauses.len() {
        0 => Document::new(),
        1 => clauses.remove(0),
        _ => single(
            "$and",
            Value::Array(clauses.into_iter().map(Value::Object).collect()),
        ),
    }
}

fn single(key: &str, value: Value) -> Document {
    let mut document = Document::new();
    document.insert(key.to_string(), value);
    document
}

fn non_empty(clause: Document) -> Vec<Document> {
    if clause.is_empty() {
        Vec::new()
    } else {
        vec![clause]
    }
}
