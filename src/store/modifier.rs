//! Update modifier application for the in-memory store
//!
//! Supported operators: `$set`, `$unset`, `$inc`, `$push` (with `$each`),
//! `$addToSet` (with `$each`), `$pull` (literal or condition such as `$in`).
//! Field paths are top-level.

use serde_json::{Number, Value};

use super::backend::{Document, ID_KEY};
use super::errors::{StoreError, StoreResult};
use super::matcher::QueryMatcher;

/// Backend code for a malformed modifier document
pub const BAD_MODIFIER_CODE: i32 = 9;

/// Applies modifier documents to stored documents
pub struct ModifierApplier;

impl ModifierApplier {
    /// Applies every operator in `modifiers` to `document`.
    ///
    /// The document is left untouched if any operator fails.
    pub fn apply(document: &mut Document, modifiers: &Document) -> StoreResult<()> {
        let mut updated = document.clone();

        for (operator, fields) in modifiers {
            let fields = fields.as_object().ok_or_else(|| {
                Self::bad_modifier(format!("Modifier {} expects a document", operator))
            })?;

            for (field, operand) in fields {
                if field == ID_KEY {
                    return Err(Self::bad_modifier(format!(
                        "Performing an update on the path '{}' would modify the immutable field",
                        ID_KEY
                    )));
                }
                Self::apply_operator(&mut updated, operator, field, operand)?;
            }
        }

        *document = updated;
        Ok(())
    }

    fn apply_operator(
        document: &mut Document,
        operator: &str,
        field: &str,
        operand: &Value,
    ) -> StoreResult<()> {
        match operator {
            "$set" => {
                document.insert(field.to_string(), operand.clone());
            }
            "$unset" => {
                document.remove(field);
            }
            "$inc" => {
                let sum = match (document.get(field), operand) {
                    (None, Value::Number(_)) => operand.clone(),
                    (Some(Value::Number(current)), Value::Number(delta)) => {
                        Self::add_numbers(current, delta)
                    }
                    _ => {
                        return Err(Self::bad_modifier(format!(
                            "Cannot apply $inc to non-numeric field '{}'",
                            field
                        )))
                    }
                };
                document.insert(field.to_string(), sum);
            }
            "$push" | "$addToSet" => {
                let items = Self::each_items(operand);
                let target = Self::array_field(document, field)?;
                for item in items {
                    if operator == "$addToSet" && target.contains(&item) {
                        continue;
                    }
                    target.push(item);
                }
            }
            "$pull" => {
                if let Some(target) = document.get_mut(field) {
                    let target = target.as_array_mut().ok_or_else(|| {
                        Self::bad_modifier(format!("Cannot apply $pull to non-array field '{}'", field))
                    })?;
                    target.retain(|item| !QueryMatcher::matches_condition(Some(item), operand));
                }
            }
            other => {
                return Err(Self::bad_modifier(format!("Unknown modifier: {}", other)));
            }
        }
        Ok(())
    }

    /// `{"$each": [...]}` expands to its elements; anything else is one element
    fn each_items(operand: &Value) -> Vec<Value> {
        match operand.as_object().and_then(|o| o.get("$each")) {
            Some(Value::Array(items)) => items.clone(),
            _ => vec![operand.clone()],
        }
    }

    fn array_field<'a>(document: &'a mut Document, field: &str) -> StoreResult<&'a mut Vec<Value>> {
        document
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| {
                Self::bad_modifier(format!("The field '{}' must be an array", field))
            })
    }

    fn add_numbers(a: &Number, b: &Number) -> Value {
        if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
            if let Some(sum) = ai.checked_add(bi) {
                return Value::from(sum);
            }
        }
        let sum = a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0);
        Number::from_f64(sum).map_or(Value::Null, Value::Number)
    }

    fn bad_modifier(message: String) -> StoreError {
        StoreError::with_code(BAD_MODIFIER_CODE, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn apply(document: Value, modifiers: Value) -> StoreResult<Value> {
        let mut document = doc(document);
        ModifierApplier::apply(&mut document, &doc(modifiers))?;
        Ok(Value::Object(document))
    }

    #[test]
    fn test_set_and_unset() {
        let result = apply(
            json!({"_id": "1", "a": 1, "b": 2}),
            json!({"$set": {"a": 10}, "$unset": {"b": ""}}),
        )
        .unwrap();
        assert_eq!(result, json!({"_id": "1", "a": 10}));
    }

    #[test]
    fn test_push_each() {
        let result = apply(
            json!({"tags": ["a"]}),
            json!({"$push": {"tags": {"$each": ["b", "c"]}}}),
        )
        .unwrap();
        assert_eq!(result, json!({"tags": ["a", "b", "c"]}));
    }

    #[test]
    fn test_push_single_creates_array() {
        let result = apply(json!({}), json!({"$push": {"tags": "a"}})).unwrap();
        assert_eq!(result, json!({"tags": ["a"]}));
    }

    #[test]
    fn test_add_to_set_skips_existing() {
        let result = apply(
            json!({"tags": ["a"]}),
            json!({"$addToSet": {"tags": {"$each": ["a", "b"]}}}),
        )
        .unwrap();
        assert_eq!(result, json!({"tags": ["a", "b"]}));
    }

    #[test]
    fn test_pull_in() {
        let result = apply(
            json!({"tags": ["a", "b", "c"]}),
            json!({"$pull": {"tags": {"$in": ["a", "c"]}}}),
        )
        .unwrap();
        assert_eq!(result, json!({"tags": ["b"]}));
    }

    #[test]
    fn test_pull_literal() {
        let result = apply(json!({"tags": ["a", "b", "a"]}), json!({"$pull": {"tags": "a"}})).unwrap();
        assert_eq!(result, json!({"tags": ["b"]}));
    }

    #[test]
    fn test_inc() {
        let result = apply(json!({"n": 1}), json!({"$inc": {"n": 2, "m": 5}})).unwrap();
        assert_eq!(result, json!({"n": 3, "m": 5}));
    }

    #[test]
    fn test_push_onto_scalar_fails_atomically() {
        let mut document = doc(json!({"a": 1, "name": "x"}));
        let result = ModifierApplier::apply(
            &mut document,
            &doc(json!({"$set": {"a": 2}, "$push": {"name": "y"}})),
        );

        assert_eq!(result.unwrap_err().code(), Some(BAD_MODIFIER_CODE));
        assert_eq!(Value::Object(document), json!({"a": 1, "name": "x"}));
    }

    #[test]
    fn test_unknown_modifier() {
        assert!(apply(json!({}), json!({"$rename": {"a": "b"}})).is_err());
    }

    #[test]
    fn test_id_is_immutable() {
        assert!(apply(json!({"_id": "1"}), json!({"$set": {"_id": "2"}})).is_err());
    }
}
