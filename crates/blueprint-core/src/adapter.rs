//! Persistence adapters: the glue between an application's record layer and
//! the blueprint registry.
//!
//! An adapter is told about every class registered through `setup` and may
//! contribute extra read accessors to the document view of a schema.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use anyhow::{anyhow, Context};
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::{DocumentWriter, Indexable, RecordLoader};
use crate::types::{FieldValue, StoredDocument};

pub trait PersistenceAdapter: Send + Sync + fmt::Debug {
    /// Called once per `setup` of `class`.
    fn add_class_integration(&self, class: &str) -> anyhow::Result<()>;

    /// Layer adapter accessors onto a document view while it is built.
    fn add_document_accessors(&self, accessors: &mut AccessorSet);
}

/// What an adapter-contributed accessor yields for a document.
#[derive(Clone)]
pub enum Resolved {
    Absent,
    Value(FieldValue),
    Object(Arc<dyn Indexable>),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Absent => f.write_str("Absent"),
            Resolved::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Resolved::Object(o) => f.debug_tuple("Object").field(&o.document_id()).finish(),
        }
    }
}

pub trait DocumentAccessor: Send + Sync {
    fn get(&self, doc: &StoredDocument) -> Result<Resolved>;
}

/// Named accessors contributed by an adapter.
#[derive(Default, Clone)]
pub struct AccessorSet {
    accessors: BTreeMap<String, Arc<dyn DocumentAccessor>>,
}

impl AccessorSet {
    pub fn new() -> Self { Self::default() }

    /// Returns `false` when an accessor with that name was replaced.
    pub fn insert(&mut self, name: impl Into<String>, accessor: Arc<dyn DocumentAccessor>) -> bool {
        self.accessors.insert(name.into(), accessor).is_none()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DocumentAccessor>> {
        self.accessors.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl fmt::Debug for AccessorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.accessors.keys()).finish()
    }
}

/// Adapter for classes without a record layer: no hooks, no extra accessors.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericAdapter;

impl PersistenceAdapter for GenericAdapter {
    fn add_class_integration(&self, class: &str) -> anyhow::Result<()> {
        debug!(class, "generic adapter: nothing to integrate");
        Ok(())
    }

    fn add_document_accessors(&self, _accessors: &mut AccessorSet) {}
}

/// Adapter for record-backed classes.
///
/// Integrated classes get save/destroy hooks that keep the index in sync
/// through a `DocumentWriter`, and a rebuild operation fed by the
/// `RecordLoader`. Document views gain an `indexed_object` accessor that
/// loads the live record a document was built from.
///
/// The writer is held weakly: a writer usually owns the registry that owns
/// this adapter. Callers keep their own handle to the writer alive.
pub struct RecordAdapter {
    writer: Weak<dyn DocumentWriter>,
    loader: Arc<dyn RecordLoader>,
    integrated: RwLock<HashSet<String>>,
}

pub const INDEXED_OBJECT_ACCESSOR: &str = "indexed_object";

impl RecordAdapter {
    pub fn new(writer: Arc<dyn DocumentWriter>, loader: Arc<dyn RecordLoader>) -> Self {
        Self { writer: Arc::downgrade(&writer), loader, integrated: RwLock::new(HashSet::new()) }
    }

    fn writer(&self) -> anyhow::Result<Arc<dyn DocumentWriter>> {
        self.writer.upgrade().ok_or_else(|| anyhow!("index writer has been dropped"))
    }

    pub fn is_integrated(&self, class: &str) -> bool {
        self.integrated
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }

    pub fn after_save(&self, object: &dyn Indexable) -> anyhow::Result<()> {
        self.ensure_integrated(object.class_name())?;
        self.writer()?
            .index(object)
            .with_context(|| format!("indexing {}", object.document_id()))
    }

    pub fn after_destroy(&self, object: &dyn Indexable) -> anyhow::Result<()> {
        self.ensure_integrated(object.class_name())?;
        self.writer()?
            .unindex(object)
            .with_context(|| format!("unindexing {}", object.document_id()))
    }

    /// Re-index every record of `class`; returns the number of documents written.
    pub fn rebuild_index(&self, class: &str) -> anyhow::Result<usize> {
        self.ensure_integrated(class)?;
        let records = self.loader.all(class)?;
        let count = self.writer()?.reindex_class(class, &records)?;
        info!(class, count, "rebuilt index");
        Ok(count)
    }

    fn ensure_integrated(&self, class: &str) -> anyhow::Result<()> {
        if self.is_integrated(class) {
            Ok(())
        } else {
            Err(anyhow!("class {class} is not integrated with the record adapter"))
        }
    }
}

impl fmt::Debug for RecordAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordAdapter")
            .field("integrated", &self.integrated)
            .finish_non_exhaustive()
    }
}

impl PersistenceAdapter for RecordAdapter {
    fn add_class_integration(&self, class: &str) -> anyhow::Result<()> {
        self.integrated
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class.to_string());
        info!(class, "record hooks installed");
        Ok(())
    }

    fn add_document_accessors(&self, accessors: &mut AccessorSet) {
        accessors.insert(
            INDEXED_OBJECT_ACCESSOR,
            Arc::new(IndexedObjectAccessor { loader: Arc::clone(&self.loader) }),
        );
    }
}

struct IndexedObjectAccessor {
    loader: Arc<dyn RecordLoader>,
}

impl DocumentAccessor for IndexedObjectAccessor {
    fn get(&self, doc: &StoredDocument) -> Result<Resolved> {
        let (class, key) = doc
            .uid
            .split_once('-')
            .ok_or_else(|| anyhow!("malformed document id {:?}", doc.uid))?;
        Ok(match self.loader.load(class, key)? {
            Some(object) => Resolved::Object(object),
            None => Resolved::Absent,
        })
    }
}
