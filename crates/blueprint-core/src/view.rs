use tracing::warn;

use crate::adapter::{AccessorSet, PersistenceAdapter, Resolved};
use crate::codec;
use crate::error::{Error, Result};
use crate::schema::{CLASS_SLOT, INDEXED_CLASS_PREFIX};
use crate::types::{FieldValue, StoredDocument};

/// Reads one attribute out of its document slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAccessor {
    name: String,
    slot: usize,
}

impl AttributeAccessor {
    pub fn name(&self) -> &str { &self.name }
    pub fn slot(&self) -> usize { self.slot }

    /// Decoded value; `None` when the stored value is the null encoding.
    pub fn read(&self, doc: &StoredDocument) -> Result<Option<FieldValue>> {
        let raw = doc
            .value(self.slot)
            .ok_or_else(|| Error::MissingSlot { slot: self.slot, name: self.name.clone() })?;
        match codec::decode(raw)? {
            FieldValue::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}

/// Decode-side view of the documents written with one schema.
#[derive(Debug)]
pub struct DocumentView {
    attributes: Vec<AttributeAccessor>,
    extensions: AccessorSet,
}

impl DocumentView {
    pub(crate) fn build(attributes: &[String], adapter: &dyn PersistenceAdapter) -> Self {
        let attributes: Vec<AttributeAccessor> = attributes
            .iter()
            .enumerate()
            .map(|(i, name)| AttributeAccessor { name: name.clone(), slot: i + 1 })
            .collect();
        let mut extensions = AccessorSet::new();
        adapter.add_document_accessors(&mut extensions);
        for name in extensions.names() {
            if name == INDEXED_CLASS_PREFIX || attributes.iter().any(|a| a.name == name) {
                warn!(accessor = name, "adapter accessor is shadowed by a schema accessor");
            }
        }
        Self { attributes, extensions }
    }

    /// Raw class name stored in slot 0.
    pub fn indexed_class<'d>(&self, doc: &'d StoredDocument) -> Result<&'d str> {
        doc.value(CLASS_SLOT).ok_or_else(|| Error::MissingSlot {
            slot: CLASS_SLOT,
            name: INDEXED_CLASS_PREFIX.to_string(),
        })
    }

    pub fn accessor(&self, name: &str) -> Option<&AttributeAccessor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn get(&self, doc: &StoredDocument, name: &str) -> Result<Option<FieldValue>> {
        self.accessor(name)
            .ok_or_else(|| Error::UnknownAccessor(name.to_string()))?
            .read(doc)
    }

    /// All attributes in slot order.
    pub fn decode_all<'v>(&'v self, doc: &StoredDocument) -> Result<Vec<(&'v str, Option<FieldValue>)>> {
        self.attributes
            .iter()
            .map(|a| Ok((a.name.as_str(), a.read(doc)?)))
            .collect()
    }

    pub fn extensions(&self) -> &AccessorSet {
        &self.extensions
    }

    /// Evaluate any accessor by name: schema accessors first, then the
    /// ones contributed by the adapter.
    pub fn resolve(&self, doc: &StoredDocument, name: &str) -> Result<Resolved> {
        if name == INDEXED_CLASS_PREFIX {
            return Ok(Resolved::Value(FieldValue::Text(self.indexed_class(doc)?.to_string())));
        }
        if let Some(accessor) = self.accessor(name) {
            return Ok(accessor.read(doc)?.map_or(Resolved::Absent, Resolved::Value));
        }
        match self.extensions.get(name) {
            Some(extension) => extension.get(doc),
            None => Err(Error::UnknownAccessor(name.to_string())),
        }
    }
}
