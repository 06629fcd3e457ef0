//! Slot value codec.
//!
//! Values are stored as tagged JSON (`{"type":"integer","value":1}`), which
//! keeps the type of every list item without a schema on the read side.

use crate::error::{Error, Result};
use crate::types::FieldValue;

/// Canonical encoding of `FieldValue::Null`.
pub const NULL_ENCODING: &str = r#"{"type":"null"}"#;

pub fn encode(value: &FieldValue) -> Result<String> {
    ensure_finite(value)?;
    serde_json::to_string(value).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode a stored slot value.
///
/// Malformed input is an `Error::Decode`, never a `FieldValue::Null`.
pub fn decode(raw: &str) -> Result<FieldValue> {
    serde_json::from_str(raw).map_err(|e| Error::Decode(format!("{e} in {raw:?}")))
}

// serde_json writes NaN and infinities as `null`, which would not decode back.
fn ensure_finite(value: &FieldValue) -> Result<()> {
    match value {
        FieldValue::Float(f) if !f.is_finite() => Err(Error::Encode(format!("non-finite float {f}"))),
        FieldValue::List(items) => items.iter().try_for_each(ensure_finite),
        _ => Ok(()),
    }
}
