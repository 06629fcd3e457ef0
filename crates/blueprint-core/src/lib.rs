#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! blueprint-core
//!
//! Maps application classes onto search-index document layouts: per-class
//! schemas, the process-wide registry, the slot value codec and the
//! decode-side document view. Storage bindings live in `blueprint-text`.

pub mod adapter;
pub mod codec;
pub mod config;
pub mod error;
pub mod indexer;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod types;
pub mod view;

pub use adapter::{AccessorSet, DocumentAccessor, GenericAdapter, PersistenceAdapter, RecordAdapter, Resolved};
pub use error::{Error, Result};
pub use indexer::{DocumentDraft, WeightedText};
pub use registry::SchemaRegistry;
pub use schema::{AttributeOptions, IndexOptions, Schema, INDEXED_CLASS_PREFIX, MAX_WEIGHT};
pub use traits::{DocumentWriter, Indexable, RecordLoader};
pub use types::{FieldValue, StoredDocument};
pub use view::{AttributeAccessor, DocumentView};
