use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tantivy::directory::MmapDirectory;
use tantivy::tokenizer::Language;
use tantivy::{Index, IndexWriter, TantivyDocument, Term};
use tracing::{debug, info};

use blueprint_core::config::IndexSettings;
use blueprint_core::{DocumentDraft, DocumentWriter, Indexable, SchemaRegistry, INDEXED_CLASS_PREFIX, MAX_WEIGHT};

use crate::search::TantivyReader;
use crate::tantivy_utils::{analyze, build_analyzer, build_schema, prefixed_term, stemmer_language, DocFields};

// tantivy refuses smaller per-thread arenas.
const MIN_WRITER_BUDGET: usize = 15_000_000;

/// Writes blueprint documents into a tantivy index.
///
/// Every object is resolved against the registry, turned into a
/// `DocumentDraft` and stored with its slot values in order. Indexed texts
/// become `<prefix>:<token>` and bare `<token>` terms, repeated `weight`
/// times (at most `MAX_WEIGHT`). The class name is never stemmed. Each
/// public operation commits before returning.
pub struct TantivyWriter {
	index: Index,
	writer: Mutex<IndexWriter>,
	registry: Arc<SchemaRegistry>,
	fields: DocFields,
	default_language: Option<Language>,
}

impl TantivyWriter {
	/// Open the index in `index_dir`, creating it when missing.
	pub fn new(index_dir: PathBuf, registry: Arc<SchemaRegistry>) -> Result<Self> {
		std::fs::create_dir_all(&index_dir)?;
		let index = Index::open_or_create(MmapDirectory::open(&index_dir)?, build_schema())?;
		info!(dir = %index_dir.display(), "opened index");
		Self::with_index(index, registry, IndexSettings::default().writer_memory_budget, None)
	}

	pub fn in_memory(registry: Arc<SchemaRegistry>) -> Result<Self> {
		Self::with_index(Index::create_in_ram(build_schema()), registry, IndexSettings::default().writer_memory_budget, None)
	}

	/// Writer for configured settings; relative paths resolve against `base`.
	pub fn from_settings(settings: &IndexSettings, base: &Path, registry: Arc<SchemaRegistry>) -> Result<Self> {
		let index = match settings.resolved_path(base) {
			Some(dir) => {
				std::fs::create_dir_all(&dir)?;
				Index::open_or_create(MmapDirectory::open(&dir)?, build_schema())?
			}
			None => Index::create_in_ram(build_schema()),
		};
		let language = match settings.language.as_deref() {
			Some(code) => Some(stemmer_language(code).ok_or_else(|| anyhow!("no stemmer for language {code:?}"))?),
			None => None,
		};
		Self::with_index(index, registry, settings.writer_memory_budget, language)
	}

	fn with_index(index: Index, registry: Arc<SchemaRegistry>, memory_budget: usize, default_language: Option<Language>) -> Result<Self> {
		let fields = DocFields::from_schema(&index.schema())?;
		let writer = index.writer_with_num_threads(1, memory_budget.max(MIN_WRITER_BUDGET))?;
		Ok(Self { index, writer: Mutex::new(writer), registry, fields, default_language })
	}

	pub fn reader(&self) -> Result<TantivyReader> {
		TantivyReader::new(self.index.clone(), self.default_language.clone())
	}

	fn to_document(&self, draft: &DocumentDraft) -> TantivyDocument {
		let mut doc = TantivyDocument::default();
		doc.add_text(self.fields.uid, &draft.uid);
		doc.add_text(self.fields.class, &draft.class);
		for value in &draft.values { doc.add_text(self.fields.values, value); }

		let language = match draft.language.as_deref() {
			Some(code) => stemmer_language(code).or_else(|| {
				debug!(uid = %draft.uid, code, "no stemmer for language, using default");
				self.default_language.clone()
			}),
			None => self.default_language.clone(),
		};
		let mut analyzer = build_analyzer(language);
		let mut plain = build_analyzer(None);
		for text in &draft.texts {
			let analyzer = if text.prefix == INDEXED_CLASS_PREFIX { &mut plain } else { &mut analyzer };
			for token in analyze(analyzer, &text.text) {
				let prefixed = prefixed_term(&text.prefix, &token);
				for _ in 0..text.weight.min(MAX_WEIGHT) {
					doc.add_text(self.fields.terms, &prefixed);
					doc.add_text(self.fields.terms, &token);
				}
			}
		}
		doc
	}

	fn lock_writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
		self.writer.lock().map_err(|_| anyhow!("index writer lock poisoned"))
	}
}

impl DocumentWriter for TantivyWriter {
	fn index(&self, object: &dyn Indexable) -> Result<()> {
		let draft = self.registry.draft_for(object)?;
		let doc = self.to_document(&draft);
		let mut writer = self.lock_writer()?;
		writer.delete_term(Term::from_field_text(self.fields.uid, &draft.uid));
		writer.add_document(doc)?;
		writer.commit()?;
		debug!(uid = %draft.uid, "indexed document");
		Ok(())
	}

	fn unindex(&self, object: &dyn Indexable) -> Result<()> {
		let uid = object.document_id();
		let mut writer = self.lock_writer()?;
		writer.delete_term(Term::from_field_text(self.fields.uid, &uid));
		writer.commit()?;
		debug!(uid = %uid, "removed document");
		Ok(())
	}

	fn reindex_class(&self, class: &str, objects: &[Arc<dyn Indexable>]) -> Result<usize> {
		// Build every draft first so a bad object leaves the index untouched.
		let docs = objects
			.iter()
			.map(|object| -> Result<(String, TantivyDocument)> {
				let draft = self.registry.draft_for(object.as_ref())?;
				Ok((draft.uid.clone(), self.to_document(&draft)))
			})
			.collect::<Result<Vec<_>>>()?;
		let mut writer = self.lock_writer()?;
		writer.delete_term(Term::from_field_text(self.fields.class, class));
		// Objects of another class still replace their own document.
		for (uid, doc) in docs {
			writer.delete_term(Term::from_field_text(self.fields.uid, &uid));
			writer.add_document(doc)?;
		}
		writer.commit()?;
		info!(class, count = objects.len(), "reindexed class");
		Ok(objects.len())
	}
}
