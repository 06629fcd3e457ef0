//! Index-time plan for one object.
//!
//! A `DocumentDraft` holds everything a storage binding needs to persist an
//! object: its document id, the slot values in schema order and the texts to
//! turn into weighted terms.

use tracing::debug;

use crate::codec;
use crate::error::{Error, Result};
use crate::schema::{Schema, INDEXED_CLASS_PREFIX};
use crate::traits::Indexable;
use crate::types::FieldValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedText {
    pub prefix: String,
    pub text: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDraft {
    pub uid: String,
    pub class: String,
    pub values: Vec<String>,
    pub texts: Vec<WeightedText>,
    pub language: Option<String>,
}

impl DocumentDraft {
    pub fn build(schema: &Schema, object: &dyn Indexable) -> Result<Self> {
        let class = object.class_name().to_string();

        let mut values = Vec::with_capacity(schema.attributes_list().len() + 1);
        values.push(class.clone());
        for attribute in schema.attributes_list() {
            values.push(codec::encode(&call(object, attribute)?)?);
        }

        let mut texts = Vec::new();
        for (method, options) in schema.indexed_fields() {
            if let Some(text) = call(object, method)?.to_text() {
                texts.push(WeightedText { prefix: method.to_string(), text, weight: options.weight() });
            }
        }
        texts.push(WeightedText { prefix: INDEXED_CLASS_PREFIX.to_string(), text: class.clone(), weight: 1 });

        let language = match schema.language_selector() {
            Some(selector) => match call(object, selector)? {
                FieldValue::Text(code) if !code.trim().is_empty() => Some(code.trim().to_lowercase()),
                _ => None,
            },
            None => None,
        };

        let draft = Self { uid: object.document_id(), class, values, texts, language };
        debug!(uid = %draft.uid, slots = draft.values.len(), texts = draft.texts.len(), "built document draft");
        Ok(draft)
    }
}

fn call(object: &dyn Indexable, method: &str) -> Result<FieldValue> {
    object.field(method).ok_or_else(|| Error::MissingMethod {
        class: object.class_name().to_string(),
        method: method.to_string(),
    })
}
