mod common;

use blueprint_core::codec::encode;
use blueprint_core::{Error, FieldValue, Resolved, SchemaRegistry, StoredDocument};
use common::{birthday, IndexedObject};

fn registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry
        .setup("IndexedObject", |s| {
            s.attribute("id")
                .attribute("name")
                .attribute("date_of_birth")
                .attribute("empty_field")
                .attribute("array");
        })
        .expect("setup");
    registry
}

fn stored() -> StoredDocument {
    let object = IndexedObject::new(1, "Kogler");
    StoredDocument::new(
        "IndexedObject-1",
        vec![
            "IndexedObject".to_string(),
            encode(&FieldValue::Integer(1)).expect("encode"),
            encode(&FieldValue::from("Kogler")).expect("encode"),
            encode(&FieldValue::Date(birthday())).expect("encode"),
            encode(&FieldValue::Null).expect("encode"),
            encode(&FieldValue::List(object.array())).expect("encode"),
        ],
    )
}

#[test]
fn view_has_an_accessor_per_attribute() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    assert_eq!(view.attribute_names().collect::<Vec<_>>(), ["id", "name", "date_of_birth", "empty_field", "array"]);
    assert_eq!(view.accessor("array").map(|a| a.slot()), Some(5));
    assert!(view.accessor("missing").is_none());
    assert!(view.extensions().is_empty());
}

#[test]
fn view_decodes_stored_values() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    let doc = stored();

    assert_eq!(view.indexed_class(&doc).expect("class"), "IndexedObject");
    assert_eq!(view.get(&doc, "id").expect("id"), Some(FieldValue::Integer(1)));
    assert_eq!(view.get(&doc, "name").expect("name"), Some(FieldValue::from("Kogler")));
    assert_eq!(
        view.get(&doc, "date_of_birth").expect("date").and_then(|v| v.as_date()),
        Some(birthday())
    );
    assert_eq!(view.get(&doc, "empty_field").expect("empty"), None);
    assert_eq!(
        view.get(&doc, "array").expect("array"),
        Some(FieldValue::List(IndexedObject::new(1, "Kogler").array()))
    );
}

#[test]
fn decode_all_follows_slot_order() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    let decoded = view.decode_all(&stored()).expect("decode all");
    let names: Vec<&str> = decoded.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, ["id", "name", "date_of_birth", "empty_field", "array"]);
    assert!(decoded[3].1.is_none());
}

#[test]
fn corrupt_slot_is_an_error_not_absent() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    let mut doc = stored();
    doc.values[2] = "--- Kogler\n".to_string();

    assert!(matches!(view.get(&doc, "name"), Err(Error::Decode(_))));
    assert_eq!(view.get(&doc, "id").expect("other slots still decode"), Some(FieldValue::Integer(1)));
}

#[test]
fn short_documents_report_the_missing_slot() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    let mut doc = stored();
    doc.values.truncate(3);

    match view.get(&doc, "array") {
        Err(Error::MissingSlot { slot, name }) => {
            assert_eq!(slot, 5);
            assert_eq!(name, "array");
        }
        other => panic!("expected missing slot, got {other:?}"),
    }
    let empty = StoredDocument::new("IndexedObject-1", Vec::new());
    assert!(matches!(view.indexed_class(&empty), Err(Error::MissingSlot { slot: 0, .. })));
}

#[test]
fn unknown_names_are_rejected() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    assert!(matches!(view.get(&stored(), "salary"), Err(Error::UnknownAccessor(_))));
    assert!(matches!(view.resolve(&stored(), "salary"), Err(Error::UnknownAccessor(_))));
}

#[test]
fn resolve_covers_class_and_attributes() {
    let view = registry().schema_for("IndexedObject").expect("schema").accessors_module();
    let doc = stored();

    match view.resolve(&doc, "indexed_class").expect("class") {
        Resolved::Value(FieldValue::Text(class)) => assert_eq!(class, "IndexedObject"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(view.resolve(&doc, "empty_field"), Ok(Resolved::Absent)));
    assert!(matches!(view.resolve(&doc, "id"), Ok(Resolved::Value(FieldValue::Integer(1)))));
}
