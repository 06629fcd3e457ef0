//! Class → schema registry.
//!
//! Schemas are registered during application start-up and read concurrently
//! afterwards. `setup` calls are serialized; a registered schema is never
//! mutated, only replaced by a later `setup` for the same class.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

use anyhow::Context;
use tracing::{debug, info};

use crate::adapter::{GenericAdapter, PersistenceAdapter};
use crate::error::{Error, Result};
use crate::indexer::DocumentDraft;
use crate::schema::{Schema, INDEXED_CLASS_PREFIX};
use crate::traits::Indexable;

#[derive(Default)]
struct State {
    // Registration order; re-registering keeps the original position.
    schemas: Vec<(String, Arc<Schema>)>,
    default_adapter: Option<Arc<dyn PersistenceAdapter>>,
    prefixes: Option<Arc<[String]>>,
}

#[derive(Default)]
pub struct SchemaRegistry {
    setup_lock: Mutex<()>,
    state: RwLock<State>,
}

impl SchemaRegistry {
    pub fn new() -> Self { Self::default() }

    /// Register the schema of `class`, replacing any previous one.
    ///
    /// The schema stays registered even when the adapter's class
    /// integration fails; the failure is returned to the caller.
    pub fn setup<F>(&self, class: impl Into<String>, configure: F) -> Result<()>
    where
        F: FnOnce(&mut Schema),
    {
        let class = class.into();
        let _serial = self.setup_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut schema = Schema::new();
        configure(&mut schema);
        let adapter: Arc<dyn PersistenceAdapter> = schema
            .configured_adapter()
            .cloned()
            .or_else(|| self.default_adapter())
            .unwrap_or_else(|| Arc::new(GenericAdapter) as Arc<dyn PersistenceAdapter>);
        schema.seal(Arc::clone(&adapter));

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let schema = Arc::new(schema);
            match state.schemas.iter_mut().find(|(c, _)| *c == class) {
                Some((_, existing)) => *existing = schema,
                None => state.schemas.push((class.clone(), schema)),
            }
            state.prefixes = None;
        }
        info!(class = %class, adapter = ?adapter, "registered schema");

        adapter
            .add_class_integration(&class)
            .with_context(|| format!("integrating class {class}"))?;
        Ok(())
    }

    pub fn schema_for(&self, class: &str) -> Option<Arc<Schema>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.schemas.iter().find(|(c, _)| c == class).map(|(_, s)| Arc::clone(s))
    }

    pub fn classes(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.schemas.iter().map(|(c, _)| c.clone()).collect()
    }

    /// Union of every schema's indexed methods plus `indexed_class`;
    /// empty while no schema is registered.
    pub fn searchable_prefixes(&self) -> Vec<String> {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if state.schemas.is_empty() {
                return Vec::new();
            }
            if let Some(prefixes) = &state.prefixes {
                return prefixes.to_vec();
            }
        }
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;
        if state.schemas.is_empty() {
            return Vec::new();
        }
        state
            .prefixes
            .get_or_insert_with(|| collect_prefixes(&state.schemas))
            .to_vec()
    }

    pub fn set_default_adapter(&self, adapter: Arc<dyn PersistenceAdapter>) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).default_adapter = Some(adapter);
    }

    pub fn default_adapter(&self) -> Option<Arc<dyn PersistenceAdapter>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).default_adapter.clone()
    }

    /// Indexing plan for `object`; its class must be registered.
    pub fn draft_for(&self, object: &dyn Indexable) -> Result<DocumentDraft> {
        let schema = self
            .schema_for(object.class_name())
            .ok_or_else(|| Error::NotRegistered(object.class_name().to_string()))?;
        DocumentDraft::build(&schema, object)
    }

    /// Forget every schema, the default adapter and the cached prefixes.
    pub fn reset(&self) {
        let _serial = self.setup_lock.lock().unwrap_or_else(PoisonError::into_inner);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = State::default();
        debug!("schema registry reset");
    }
}

fn collect_prefixes(schemas: &[(String, Arc<Schema>)]) -> Arc<[String]> {
    let mut seen = HashSet::new();
    let mut prefixes: Vec<String> = schemas
        .iter()
        .flat_map(|(_, schema)| schema.searchable_prefixes().iter())
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect();
    if !seen.contains(INDEXED_CLASS_PREFIX) {
        prefixes.push(INDEXED_CLASS_PREFIX.to_string());
    }
    debug!(count = prefixes.len(), "rebuilt searchable prefixes");
    prefixes.into()
}

static GLOBAL: LazyLock<Arc<SchemaRegistry>> = LazyLock::new(|| Arc::new(SchemaRegistry::new()));

/// The process-wide registry.
pub fn global() -> Arc<SchemaRegistry> {
    Arc::clone(&GLOBAL)
}

pub fn setup<F>(class: impl Into<String>, configure: F) -> Result<()>
where
    F: FnOnce(&mut Schema),
{
    GLOBAL.setup(class, configure)
}

pub fn schema_for(class: &str) -> Option<Arc<Schema>> {
    GLOBAL.schema_for(class)
}

pub fn searchable_prefixes() -> Vec<String> {
    GLOBAL.searchable_prefixes()
}

pub fn reset() {
    GLOBAL.reset();
}
