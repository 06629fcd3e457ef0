use anyhow::Result;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::TermQuery;
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::tokenizer::Language;
use tantivy::{Index, IndexReader, ReloadPolicy, Searcher, TantivyDocument, Term};

use blueprint_core::{StoredDocument, INDEXED_CLASS_PREFIX};

use crate::tantivy_utils::{analyze, build_analyzer, prefixed_term, stemmer_language, DocFields};

/// Read access to documents written by `TantivyWriter`.
///
/// Lookups are exact term matches; there is no query language.
pub struct TantivyReader {
	reader: IndexReader,
	fields: DocFields,
	default_language: Option<Language>,
}

impl TantivyReader {
	pub fn new(index: Index, default_language: Option<Language>) -> Result<Self> {
		let fields = DocFields::from_schema(&index.schema())?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { reader, fields, default_language })
	}

	// Manual reload so that commits made just before a read are visible.
	fn searcher(&self) -> Result<Searcher> {
		self.reader.reload()?;
		Ok(self.reader.searcher())
	}

	pub fn fetch(&self, uid: &str) -> Result<Option<StoredDocument>> {
		let searcher = self.searcher()?;
		let query = TermQuery::new(Term::from_field_text(self.fields.uid, uid), IndexRecordOption::Basic);
		let top_docs = searcher.search(&query, &TopDocs::with_limit(1))?;
		match top_docs.first() {
			Some((_, addr)) => {
				let doc: TantivyDocument = searcher.doc(*addr)?;
				Ok(Some(self.stored(&doc)))
			}
			None => Ok(None),
		}
	}

	pub fn count_class(&self, class: &str) -> Result<usize> {
		let searcher = self.searcher()?;
		let query = TermQuery::new(Term::from_field_text(self.fields.class, class), IndexRecordOption::Basic);
		Ok(searcher.search(&query, &Count)?)
	}

	/// Documents containing `word`, analyzed like indexed text, best match first.
	///
	/// With a `prefix` only terms of that indexed field match. `language`
	/// overrides the default stemmer; class names are matched unstemmed.
	pub fn find_term(&self, prefix: Option<&str>, word: &str, language: Option<&str>, limit: usize) -> Result<Vec<StoredDocument>> {
		let language = match prefix {
			Some(INDEXED_CLASS_PREFIX) => None,
			_ => language.and_then(stemmer_language).or_else(|| self.default_language.clone()),
		};
		let mut analyzer = build_analyzer(language);
		let Some(token) = analyze(&mut analyzer, word).into_iter().next() else { return Ok(Vec::new()) };
		let term_text = match prefix {
			Some(prefix) => prefixed_term(prefix, &token),
			None => token,
		};

		let searcher = self.searcher()?;
		let query = TermQuery::new(Term::from_field_text(self.fields.terms, &term_text), IndexRecordOption::WithFreqs);
		let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;
		let mut docs = Vec::with_capacity(top_docs.len());
		for (_score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			docs.push(self.stored(&doc));
		}
		Ok(docs)
	}

	fn stored(&self, doc: &TantivyDocument) -> StoredDocument {
		let uid = doc.get_first(self.fields.uid).and_then(|v| v.as_str()).unwrap_or_default().to_string();
		let values = doc.get_all(self.fields.values).filter_map(|v| v.as_str().map(str::to_string)).collect();
		StoredDocument::new(uid, values)
	}
}
