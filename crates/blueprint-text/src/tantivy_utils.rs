use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer, TokenStream};

pub const UID_FIELD: &str = "uid";
pub const CLASS_FIELD: &str = "indexed_class";
pub const VALUES_FIELD: &str = "values";
pub const TERMS_FIELD: &str = "terms";

/// Document layout: `values` holds the slots in insertion order, `terms`
/// holds pre-analyzed terms, one raw token per value.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _uid_field = schema_builder.add_text_field(UID_FIELD, STRING | STORED);
	let _class_field = schema_builder.add_text_field(CLASS_FIELD, STRING | STORED);
	let _values_field = schema_builder.add_text_field(VALUES_FIELD, TextOptions::default().set_stored());
	let terms_indexing = TextFieldIndexing::default().set_tokenizer("raw").set_index_option(IndexRecordOption::WithFreqs);
	let _terms_field = schema_builder.add_text_field(TERMS_FIELD, TextOptions::default().set_indexing_options(terms_indexing));
	schema_builder.build()
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DocFields {
	pub uid: Field,
	pub class: Field,
	pub values: Field,
	pub terms: Field,
}

impl DocFields {
	pub(crate) fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			uid: schema.get_field(UID_FIELD)?,
			class: schema.get_field(CLASS_FIELD)?,
			values: schema.get_field(VALUES_FIELD)?,
			terms: schema.get_field(TERMS_FIELD)?,
		})
	}
}

/// Stemmer language for an ISO 639-1 code.
pub fn stemmer_language(code: &str) -> Option<Language> {
	let language = match code.trim().to_ascii_lowercase().as_str() {
		"ar" => Language::Arabic,
		"da" => Language::Danish,
		"nl" => Language::Dutch,
		"en" => Language::English,
		"fi" => Language::Finnish,
		"fr" => Language::French,
		"de" => Language::German,
		"el" => Language::Greek,
		"hu" => Language::Hungarian,
		"it" => Language::Italian,
		"no" | "nb" => Language::Norwegian,
		"pt" => Language::Portuguese,
		"ro" => Language::Romanian,
		"ru" => Language::Russian,
		"es" => Language::Spanish,
		"sv" => Language::Swedish,
		"ta" => Language::Tamil,
		"tr" => Language::Turkish,
		_ => return None,
	};
	Some(language)
}

pub fn build_analyzer(language: Option<Language>) -> TextAnalyzer {
	match language {
		Some(language) => TextAnalyzer::builder(SimpleTokenizer::default())
			.filter(LowerCaser)
			.filter(Stemmer::new(language))
			.build(),
		None => TextAnalyzer::builder(SimpleTokenizer::default()).filter(LowerCaser).build(),
	}
}

pub fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
	let mut stream = analyzer.token_stream(text);
	let mut tokens = Vec::new();
	while stream.advance() { tokens.push(stream.token().text.clone()); }
	tokens
}

pub fn prefixed_term(prefix: &str, token: &str) -> String {
	format!("{prefix}:{token}")
}
