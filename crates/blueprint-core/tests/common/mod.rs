#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use blueprint_core::{DocumentWriter, FieldValue, Indexable, RecordLoader};
use chrono::NaiveDate;

pub fn birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1968, 4, 22).expect("valid date")
}

#[derive(Debug, Clone)]
pub struct IndexedObject {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub lang_cd: Option<String>,
}

impl IndexedObject {
    pub fn new(id: i64, name: &str) -> Self {
        Self { id, name: name.to_string(), date_of_birth: birthday(), lang_cd: None }
    }

    pub fn array(&self) -> Vec<FieldValue> {
        vec![FieldValue::Integer(1), FieldValue::from("two"), FieldValue::Date(self.date_of_birth)]
    }
}

impl Indexable for IndexedObject {
    fn class_name(&self) -> &str { "IndexedObject" }
    fn primary_key(&self) -> String { self.id.to_string() }

    fn field(&self, method: &str) -> Option<FieldValue> {
        Some(match method {
            "id" => FieldValue::Integer(self.id),
            "name" => FieldValue::from(self.name.as_str()),
            "date_of_birth" => FieldValue::Date(self.date_of_birth),
            "empty_field" => FieldValue::Null,
            "array" => FieldValue::List(self.array()),
            "lang_cd" => FieldValue::from(self.lang_cd.clone()),
            _ => return None,
        })
    }
}

/// Records every call instead of persisting anything.
#[derive(Default)]
pub struct RecordingWriter {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingWriter {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl DocumentWriter for RecordingWriter {
    fn index(&self, object: &dyn Indexable) -> anyhow::Result<()> {
        self.calls.lock().expect("lock").push(format!("index {}", object.document_id()));
        Ok(())
    }

    fn unindex(&self, object: &dyn Indexable) -> anyhow::Result<()> {
        self.calls.lock().expect("lock").push(format!("unindex {}", object.document_id()));
        Ok(())
    }

    fn reindex_class(&self, class: &str, objects: &[Arc<dyn Indexable>]) -> anyhow::Result<usize> {
        self.calls.lock().expect("lock").push(format!("reindex {class} ({})", objects.len()));
        Ok(objects.len())
    }
}

#[derive(Default)]
pub struct MemoryLoader {
    pub records: HashMap<String, Vec<Arc<dyn Indexable>>>,
}

impl MemoryLoader {
    pub fn with(objects: Vec<IndexedObject>) -> Self {
        let records = objects
            .into_iter()
            .map(|o| Arc::new(o) as Arc<dyn Indexable>)
            .collect();
        let mut map = HashMap::new();
        map.insert("IndexedObject".to_string(), records);
        Self { records: map }
    }
}

impl RecordLoader for MemoryLoader {
    fn load(&self, class: &str, key: &str) -> anyhow::Result<Option<Arc<dyn Indexable>>> {
        Ok(self
            .records
            .get(class)
            .and_then(|objs| objs.iter().find(|o| o.primary_key() == key).cloned()))
    }

    fn all(&self, class: &str) -> anyhow::Result<Vec<Arc<dyn Indexable>>> {
        Ok(self.records.get(class).cloned().unwrap_or_default())
    }
}
