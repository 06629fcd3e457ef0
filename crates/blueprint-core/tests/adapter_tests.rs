mod common;

use std::sync::Arc;

use blueprint_core::adapter::INDEXED_OBJECT_ACCESSOR;
use blueprint_core::{Error, Indexable, RecordAdapter, Resolved, SchemaRegistry, StoredDocument};
use common::{IndexedObject, MemoryLoader, RecordingWriter};

fn wired() -> (SchemaRegistry, Arc<RecordAdapter>, Arc<RecordingWriter>) {
    let writer = Arc::new(RecordingWriter::default());
    let loader = Arc::new(MemoryLoader::with(vec![IndexedObject::new(1, "Kogler"), IndexedObject::new(2, "Frei")]));
    let adapter = Arc::new(RecordAdapter::new(writer.clone(), loader));
    let registry = SchemaRegistry::new();
    registry.set_default_adapter(adapter.clone());
    registry.setup("IndexedObject", |s| { s.attributes(["id", "name"]); }).expect("setup");
    (registry, adapter, writer)
}

#[test]
fn setup_integrates_the_class() {
    let (_registry, adapter, _writer) = wired();
    assert!(adapter.is_integrated("IndexedObject"));
    assert!(!adapter.is_integrated("Object"));
}

#[test]
fn hooks_drive_the_writer() {
    let (_registry, adapter, writer) = wired();
    let object = IndexedObject::new(1, "Kogler");

    adapter.after_save(&object).expect("save hook");
    adapter.after_destroy(&object).expect("destroy hook");
    assert_eq!(adapter.rebuild_index("IndexedObject").expect("rebuild"), 2);

    assert_eq!(writer.calls(), ["index IndexedObject-1", "unindex IndexedObject-1", "reindex IndexedObject (2)"]);
}

#[test]
fn hooks_refuse_classes_that_were_never_set_up() {
    let writer = Arc::new(RecordingWriter::default());
    let adapter = RecordAdapter::new(writer.clone(), Arc::new(MemoryLoader::default()));

    assert!(adapter.after_save(&IndexedObject::new(1, "Kogler")).is_err());
    assert!(adapter.rebuild_index("IndexedObject").is_err());
    assert!(writer.calls().is_empty());
}

#[test]
fn view_resolves_the_indexed_object() {
    let (registry, _adapter, _writer) = wired();
    let view = registry.schema_for("IndexedObject").expect("schema").accessors_module();
    assert!(view.extensions().get(INDEXED_OBJECT_ACCESSOR).is_some());

    let doc = StoredDocument::new("IndexedObject-2", vec!["IndexedObject".into()]);
    match view.resolve(&doc, INDEXED_OBJECT_ACCESSOR).expect("resolve") {
        Resolved::Object(object) => assert_eq!(object.document_id(), "IndexedObject-2"),
        other => panic!("expected object, got {other:?}"),
    }

    let gone = StoredDocument::new("IndexedObject-9", vec!["IndexedObject".into()]);
    assert!(matches!(view.resolve(&gone, INDEXED_OBJECT_ACCESSOR), Ok(Resolved::Absent)));
}

#[test]
fn malformed_document_id_is_an_adapter_error() {
    let (registry, _adapter, _writer) = wired();
    let view = registry.schema_for("IndexedObject").expect("schema").accessors_module();
    let doc = StoredDocument::new("no separator", vec!["IndexedObject".into()]);

    assert!(matches!(view.resolve(&doc, INDEXED_OBJECT_ACCESSOR), Err(Error::Adapter(_))));
}

#[test]
fn caches_read_during_setup_are_rebuilt_from_the_final_schema() {
    let writer = Arc::new(RecordingWriter::default());
    let adapter = Arc::new(RecordAdapter::new(writer.clone(), Arc::new(MemoryLoader::default())));
    let registry = SchemaRegistry::new();
    registry
        .setup("IndexedObject", |s| {
            s.attribute("id");
            assert_eq!(s.searchable_prefixes(), ["id"]);
            assert!(s.accessors_module().extensions().is_empty());
            s.attribute("name").adapter(adapter.clone());
        })
        .expect("setup");

    let schema = registry.schema_for("IndexedObject").expect("schema");
    assert_eq!(schema.searchable_prefixes(), ["id", "name"]);
    let view = schema.accessors_module();
    assert_eq!(view.attribute_names().collect::<Vec<_>>(), ["id", "name"]);
    assert!(view.extensions().get(INDEXED_OBJECT_ACCESSOR).is_some());
}

#[test]
fn hooks_fail_once_the_writer_is_gone() {
    let (_registry, adapter, writer) = wired();
    drop(writer);

    let err = adapter.after_save(&IndexedObject::new(1, "Kogler")).expect_err("writer dropped");
    assert!(err.to_string().contains("writer"));
}
