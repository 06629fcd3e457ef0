//! Per-class document blueprint.
//!
//! A `Schema` lists the attributes stored verbatim in a document (their
//! declaration order assigns slots 1..N; slot 0 always holds the class name)
//! and the methods whose values are fed to term indexing, each with a weight.
//! Schemas are configured once inside `SchemaRegistry::setup` and are
//! immutable afterwards; the prefix list and the document view are built
//! lazily on first use and cached for the lifetime of the schema.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::adapter::{GenericAdapter, PersistenceAdapter};
use crate::view::DocumentView;

/// Slot holding the raw class name of the indexed object.
pub const CLASS_SLOT: usize = 0;

/// Term prefix under which the class name is indexed.
pub const INDEXED_CLASS_PREFIX: &str = "indexed_class";

/// Largest accepted weight. A weight is written as repeated terms, so its
/// cost grows with the value.
pub const MAX_WEIGHT: u32 = 100;

/// Options for an indexed method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    weight: u32,
}

impl IndexOptions {
    /// Weights are clamped to `1..=MAX_WEIGHT`.
    pub fn new(weight: u32) -> Self {
        if weight > MAX_WEIGHT {
            warn!(weight, max = MAX_WEIGHT, "index weight clamped");
        }
        Self { weight: weight.clamp(1, MAX_WEIGHT) }
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

impl Default for IndexOptions {
    fn default() -> Self { Self { weight: 1 } }
}

/// Options for a stored attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeOptions {
    pub index: bool,
    pub weight: u32,
}

impl AttributeOptions {
    pub fn unindexed() -> Self {
        Self { index: false, ..Self::default() }
    }

    pub fn weighted(weight: u32) -> Self {
        Self { weight, ..Self::default() }
    }
}

impl Default for AttributeOptions {
    fn default() -> Self { Self { index: true, weight: 1 } }
}

#[derive(Default)]
pub struct Schema {
    attributes: Vec<String>,
    indexed_fields: Vec<(String, IndexOptions)>,
    language_selector: Option<String>,
    adapter: Option<Arc<dyn PersistenceAdapter>>,
    effective_adapter: Option<Arc<dyn PersistenceAdapter>>,
    prefixes: OnceLock<Vec<String>>,
    view: OnceLock<Arc<DocumentView>>,
}

impl Schema {
    pub fn new() -> Self { Self::default() }

    /// Declare a stored attribute, indexed with weight 1.
    pub fn attribute(&mut self, name: impl Into<String>) -> &mut Self {
        self.attribute_with(name, AttributeOptions::default())
    }

    pub fn attribute_with(&mut self, name: impl Into<String>, options: AttributeOptions) -> &mut Self {
        let name = name.into();
        if self.attributes.contains(&name) {
            // A second slot for the same name would shadow the first one on read.
            warn!(attribute = %name, "attribute declared twice; keeping its first slot");
        } else {
            self.attributes.push(name.clone());
        }
        if options.index {
            self.index_with(name, IndexOptions::new(options.weight));
        }
        self
    }

    pub fn attributes<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.attribute(name);
        }
        self
    }

    /// Declare an indexed method that is not stored as an attribute.
    pub fn index(&mut self, name: impl Into<String>) -> &mut Self {
        self.index_with(name, IndexOptions::default())
    }

    pub fn index_with(&mut self, name: impl Into<String>, options: IndexOptions) -> &mut Self {
        let name = name.into();
        match self.indexed_fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = options,
            None => self.indexed_fields.push((name, options)),
        }
        self
    }

    /// Method returning the ISO 639-1 code used to stem this object's texts.
    pub fn language_method(&mut self, name: impl Into<String>) -> &mut Self {
        self.language_selector = Some(name.into());
        self
    }

    pub fn adapter(&mut self, adapter: Arc<dyn PersistenceAdapter>) -> &mut Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn attributes_list(&self) -> &[String] {
        &self.attributes
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = (&str, &IndexOptions)> {
        self.indexed_fields.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn index_options(&self, name: &str) -> Option<&IndexOptions> {
        self.indexed_fields.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn language_selector(&self) -> Option<&str> {
        self.language_selector.as_deref()
    }

    pub fn configured_adapter(&self) -> Option<&Arc<dyn PersistenceAdapter>> {
        self.adapter.as_ref()
    }

    /// Adapter resolved at registration; `GenericAdapter` for unregistered schemas.
    pub fn effective_adapter(&self) -> Arc<dyn PersistenceAdapter> {
        self.effective_adapter
            .clone()
            .or_else(|| self.adapter.clone())
            .unwrap_or_else(|| Arc::new(GenericAdapter) as Arc<dyn PersistenceAdapter>)
    }

    /// Fix the adapter and drop anything cached while the schema was still
    /// being configured.
    pub(crate) fn seal(&mut self, adapter: Arc<dyn PersistenceAdapter>) {
        self.effective_adapter = Some(adapter);
        self.prefixes = OnceLock::new();
        self.view = OnceLock::new();
    }

    /// Document slot of a stored attribute.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == name).map(|i| i + 1)
    }

    /// Names of all indexed methods, in declaration order.
    pub fn searchable_prefixes(&self) -> &[String] {
        self.prefixes
            .get_or_init(|| self.indexed_fields.iter().map(|(n, _)| n.clone()).collect())
    }

    /// Decoder for documents written with this schema, built on first use.
    pub fn accessors_module(&self) -> Arc<DocumentView> {
        self.view
            .get_or_init(|| Arc::new(DocumentView::build(&self.attributes, self.effective_adapter().as_ref())))
            .clone()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("attributes", &self.attributes)
            .field("indexed_fields", &self.indexed_fields)
            .field("language_selector", &self.language_selector)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
