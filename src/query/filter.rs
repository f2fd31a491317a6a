//! Filter specification AST
//!
//! Backend-independent description of which records a read, update or
//! delete addresses. Filters also deserialize from JSON:
//!
//! ```json
//! { "and": [
//!     { "match": { "status": ["active", "pending"] } },
//!     { "range": { "age": [18, null] } },
//!     { "not": { "exists": { "deletedAt": true } } }
//! ] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Right-hand side of a match clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchValue {
    /// Field equals any of the values
    AnyOf(Vec<Value>),
    /// Field equals the value
    Is(Value),
}

impl From<Value> for MatchValue {
    /// JSON arrays are value sets; everything else is a single value
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => MatchValue::AnyOf(values),
            other => MatchValue::Is(other),
        }
    }
}

/// Inclusive `[low, high]` bounds; either side may be open
///
/// Deserializes from a list of at most two bounds: `[]`, `[low]` or
/// `[low, high]`, with null as an open side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct RangeBounds(pub Option<Value>, pub Option<Value>);

impl TryFrom<Vec<Value>> for RangeBounds {
    type Error = String;

    fn try_from(bounds: Vec<Value>) -> Result<Self, Self::Error> {
        if bounds.len() > 2 {
            return Err(format!("expected at most 2 range bounds, found {}", bounds.len()));
        }
        let mut bounds = bounds
            .into_iter()
            .map(|bound| Some(bound).filter(|b| !b.is_null()));
        let low = bounds.next().flatten();
        let high = bounds.next().flatten();
        Ok(Self(low, high))
    }
}

impl RangeBounds {
    pub fn new(low: Option<Value>, high: Option<Value>) -> Self {
        Self(low, high)
    }

    /// Lower bound, treating JSON null as open
    pub fn low(&self) -> Option<&Value> {
        self.0.as_ref().filter(|v| !v.is_null())
    }

    /// Upper bound, treating JSON null as open
    pub fn high(&self) -> Option<&Value> {
        self.1.as_ref().filter(|v| !v.is_null())
    }
}

/// Filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Field equality or set membership
    Match(BTreeMap<String, MatchValue>),
    /// Field presence (non-null scalar, non-empty array)
    Exists(BTreeMap<String, bool>),
    /// Value range for scalars, length range for arrays
    Range(BTreeMap<String, RangeBounds>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Filter that constrains nothing
    pub fn all() -> Self {
        Filter::And(Vec::new())
    }

    /// `field == value`, or membership if `value` is a JSON array
    pub fn matches(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut clause = BTreeMap::new();
        clause.insert(field.into(), MatchValue::from(value.into()));
        Filter::Match(clause)
    }

    /// `field` equals one of `values`
    pub fn any_of(field: impl Into<String>, values: Vec<Value>) -> Self {
        let mut clause = BTreeMap::new();
        clause.insert(field.into(), MatchValue::AnyOf(values));
        Filter::Match(clause)
    }

    pub fn exists(field: impl Into<String>, present: bool) -> Self {
        let mut clause = BTreeMap::new();
        clause.insert(field.into(), present);
        Filter::Exists(clause)
    }

    pub fn range(field: impl Into<String>, low: Option<Value>, high: Option<Value>) -> Self {
        let mut clause = BTreeMap::new();
        clause.insert(field.into(), RangeBounds::new(low, high));
        Filter::Range(clause)
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Filter::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Or(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Filter) -> Self {
        Filter::Not(Box::new(child))
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::all()
    }
}
