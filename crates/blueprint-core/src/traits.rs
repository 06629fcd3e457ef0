use std::sync::Arc;

use crate::types::FieldValue;

/// An application object that can be mapped onto a document.
pub trait Indexable: Send + Sync {
    fn class_name(&self) -> &str;
    fn primary_key(&self) -> String;

    /// Value of the named method. `None` when the object has no such
    /// method; `Some(FieldValue::Null)` when it has one returning nothing.
    fn field(&self, method: &str) -> Option<FieldValue>;

    fn document_id(&self) -> String {
        format!("{}-{}", self.class_name(), self.primary_key())
    }
}

/// The storage side of indexing: turns objects into persisted documents.
pub trait DocumentWriter: Send + Sync {
    fn index(&self, object: &dyn Indexable) -> anyhow::Result<()>;
    fn unindex(&self, object: &dyn Indexable) -> anyhow::Result<()>;
    fn reindex_class(&self, class: &str, objects: &[Arc<dyn Indexable>]) -> anyhow::Result<usize>;
}

/// Loads live objects back from the application's persistence layer.
pub trait RecordLoader: Send + Sync {
    fn load(&self, class: &str, key: &str) -> anyhow::Result<Option<Arc<dyn Indexable>>>;
    fn all(&self, class: &str) -> anyhow::Result<Vec<Arc<dyn Indexable>>>;
}
