use std::env;
use std::path::Path;
use std::sync::Arc;

use blueprint_core::config::Config;
use blueprint_core::{DocumentWriter, FieldValue, Indexable, SchemaRegistry};
use blueprint_text::TantivyWriter;

// Index a handful of notes and look a word up in them.
// Usage:
//   cargo run -p blueprint-text --example notes -- <word> [--lang en]
// Notes:
//   - The index location comes from blueprint.toml / BLUEPRINT_INDEX__PATH;
//     without one the index lives in memory.

struct Note {
    id: i64,
    text: &'static str,
}

impl Indexable for Note {
    fn class_name(&self) -> &str { "Note" }
    fn primary_key(&self) -> String { self.id.to_string() }
    fn field(&self, method: &str) -> Option<FieldValue> {
        match method {
            "id" => Some(FieldValue::Integer(self.id)),
            "text" => Some(FieldValue::from(self.text)),
            _ => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut word: Option<String> = None;
    let mut lang: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" => {
                if i + 1 >= args.len() { eprintln!("--lang requires a code"); std::process::exit(2); }
                lang = Some(args[i + 1].clone());
                i += 2; continue;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown flag: {}", s); std::process::exit(2);
            }
            s => { if word.is_none() { word = Some(s.to_string()); } i += 1; }
        }
    }
    let Some(word) = word else {
        eprintln!("Usage: cargo run -p blueprint-text --example notes -- <word> [--lang en]");
        std::process::exit(1);
    };

    let config = Config::load()?;
    let settings = config.index_settings()?;
    let registry = Arc::new(SchemaRegistry::new());
    registry.setup("Note", |s| { s.attribute("id").index("text"); })?;

    let writer = TantivyWriter::from_settings(&settings, Path::new("."), Arc::clone(&registry))?;
    let notes = [
        Note { id: 1, text: "Blueprints map classes onto documents" },
        Note { id: 2, text: "Every attribute has its own slot" },
        Note { id: 3, text: "Indexed methods become weighted terms" },
    ];
    for note in &notes { writer.index(note)?; }

    let view = registry.schema_for("Note").map(|s| s.accessors_module());
    let hits = writer.reader()?.find_term(Some("text"), &word, lang.as_deref(), 10)?;
    println!("{} hit(s) for {:?}", hits.len(), word);
    for doc in hits {
        let id = match &view { Some(view) => view.get(&doc, "id")?, None => None };
        println!("  {} id={:?}", doc.uid, id);
    }
    Ok(())
}
