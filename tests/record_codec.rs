//! Record Codec Tests
//!
//! Encode/decode behavior across the schema:
//! - Missing fields materialize as [] (arrays) or null (scalars)
//! - Denormalized fields are readable but never written back
//! - Binary values normalize to raw bytes
//! - Generated identifiers are used only when a record has none

use docbridge::codec::{bytes_to_value, decode, encode};
use docbridge::ident::{IdGenerator, IdStrategy, RandomIdGenerator, UuidIdGenerator};
use docbridge::schema::SchemaError;
use docbridge::store::Document;
use docbridge::{FieldDefinition, GenericRecord, RecordType, SchemaView, StorageType};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn user_type() -> RecordType {
    RecordType::builder("user")
        .field(FieldDefinition::scalar("name"))
        .field(FieldDefinition::scalar("tags").array())
        .field(FieldDefinition::reference("createdBy").array().denormalized())
        .build()
        .unwrap()
}

fn counter_ids(record_type: &str) -> String {
    format!("{}-generated", record_type)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// {name: "Alice"} gains an id, empty tags, and an empty derived createdBy.
#[test]
fn test_round_trip_alice() {
    let user = user_type();
    let record = GenericRecord::new().set("name", "Alice");

    let document = encode(&user, &record, &counter_ids);
    assert_eq!(
        Value::Object(document.clone()),
        json!({"_id": "user-generated", "name": "Alice", "tags": [], "createdBy": []})
    );

    let decoded = decode(&user, &document).unwrap();
    assert_eq!(decoded.id.as_deref(), Some("user-generated"));
    assert_eq!(decoded.to_json(), json!({"id": "user-generated", "name": "Alice", "tags": []}));
    assert_eq!(decoded.get("createdBy"), Some(&json!([])));
    assert!(!decoded.fields.contains_key("createdBy"));
}

/// Missing array field decodes as [], missing scalar as null.
#[test]
fn test_missing_fields_get_defaults() {
    let user = user_type();
    let decoded = decode(&user, &encode(&user, &GenericRecord::with_id("u1"), &counter_ids)).unwrap();

    assert_eq!(decoded.fields["tags"], json!([]));
    assert_eq!(decoded.fields["name"], Value::Null);
}

#[test]
fn test_second_round_trip_is_stable() {
    let user = user_type();
    let record = GenericRecord::new()
        .set("name", "Bob")
        .set("tags", json!(["x"]));

    let once = decode(&user, &encode(&user, &record, &counter_ids)).unwrap();
    let twice = decode(&user, &encode(&user, &once, &counter_ids)).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_existing_id_never_regenerated() {
    let user = user_type();
    let panicking = |_: &str| -> String { panic!("generator must not be called") };

    let document = encode(&user, &GenericRecord::with_id("fixed"), &panicking);
    assert_eq!(document["_id"], "fixed");
}

#[test]
fn test_decode_without_id() {
    let user = user_type();
    let decoded = decode(&user, &Document::new()).unwrap();
    assert!(decoded.id.is_none());
}

// =============================================================================
// Binary Tests
// =============================================================================

#[test]
fn test_binary_fields_round_trip_as_bytes() {
    let file_type = RecordType::builder("file")
        .field(FieldDefinition::binary("content"))
        .build()
        .unwrap();

    let record = GenericRecord::with_id("f1").set("content", bytes_to_value(b"hello"));
    let document = encode(&file_type, &record, &counter_ids);
    let decoded = decode(&file_type, &document).unwrap();

    assert_eq!(decoded.bytes("content"), Some(b"hello".to_vec()));
}

#[test]
fn test_binary_wrapper_from_store() {
    let file_type = RecordType::builder("file")
        .field(FieldDefinition::binary("content"))
        .build()
        .unwrap();

    let stored = json!({"_id": "f1", "content": {"$binary": {"base64": "aGVsbG8=", "subType": "00"}}});
    let decoded = decode(&file_type, stored.as_object().unwrap()).unwrap();
    assert_eq!(decoded.bytes("content"), Some(b"hello".to_vec()));
}

#[test]
fn test_unreadable_binary_fails() {
    let file_type = RecordType::builder("file")
        .field(FieldDefinition::binary("content"))
        .build()
        .unwrap();

    let stored = json!({"_id": "f1", "content": true});
    let err = decode(&file_type, stored.as_object().unwrap()).unwrap_err();
    assert_eq!(err.code(), "DOCBRIDGE_INVALID_BINARY");
}

// =============================================================================
// Identifier Tests
// =============================================================================

#[test]
fn test_builtin_generators_are_unique() {
    for strategy in [IdStrategy::Random, IdStrategy::Uuid] {
        let generator = strategy.generator();
        let a = generator.generate("user");
        let b = generator.generate("user");
        assert_ne!(a, b);
    }
}

#[test]
fn test_generator_formats() {
    assert_eq!(RandomIdGenerator.generate("user").len(), 20);

    let uuid = UuidIdGenerator.generate("user");
    assert_eq!(uuid.len(), 32);
    assert!(uuid.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// Schema Loading Tests
// =============================================================================

#[test]
fn test_schema_document_drives_codec() {
    let schema = SchemaView::from_json_str(
        r#"{
            "user": [
                { "name": "name" },
                { "name": "avatar", "storage_type": "binary" },
                { "name": "posts", "storage_type": "reference", "is_array": true, "is_denormalized": true }
            ]
        }"#,
    )
    .unwrap();

    let user = schema.fields_of("user").unwrap();
    assert_eq!(user.field("avatar").unwrap().storage_type, StorageType::Binary);

    let decoded = decode(user, json!({"_id": "u1"}).as_object().unwrap()).unwrap();
    assert_eq!(decoded.fields["avatar"], Value::Null);
    assert_eq!(decoded.derived["posts"], json!([]));
}

#[test]
fn test_schema_rejects_reserved_field() {
    let err = SchemaView::from_json_str(r#"{"user": [{"name": "id"}]}"#).unwrap_err();
    assert!(matches!(err, SchemaError::ReservedField { .. }));
}
