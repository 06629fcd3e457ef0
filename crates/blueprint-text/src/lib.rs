//! blueprint-text
//!
//! Tantivy storage for blueprint documents. See `index` for the writer and
//! `search` for read access, and `examples/` for a small end-to-end run.
pub mod tantivy_utils;
pub mod index;
pub mod search;

pub use index::TantivyWriter;
pub use search::TantivyReader;
