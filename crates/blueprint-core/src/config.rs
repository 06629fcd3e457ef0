use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Settings for the storage binding that persists documents.
///
/// - `path`: index directory; `None` keeps the index in memory
/// - `language`: ISO 639-1 code used for stemming when an object's schema
///   has no language method or the method yields nothing
/// - `writer_memory_budget`: bytes handed to the index writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub path: Option<String>,
    pub language: Option<String>,
    pub writer_memory_budget: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { path: None, language: None, writer_memory_budget: 50_000_000 }
    }
}

impl IndexSettings {
    /// Index directory after `~`/`$VAR` expansion, relative to `base`.
    pub fn resolved_path(&self, base: &Path) -> Option<PathBuf> {
        self.path.as_deref().map(|p| resolve_with_base(base, p))
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Merge `blueprint.toml`, `blueprint.<env>.toml` and `BLUEPRINT_*`
    /// variables; `<env>` comes from `RUST_ENV` (default `dev`).
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::default("index", IndexSettings::default()))
            .merge(Toml::file("blueprint.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("blueprint.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("blueprint.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("blueprint.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("BLUEPRINT_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn index_settings(&self) -> crate::error::Result<IndexSettings> {
        self.figment
            .extract_inner("index")
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.index_settings()?;
        if settings.writer_memory_budget == 0 {
            anyhow::bail!(Error::InvalidConfig("index.writer_memory_budget must be positive".into()));
        }
        if let Some(lang) = &settings.language {
            if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
                anyhow::bail!(Error::InvalidConfig(format!("index.language {lang:?} is not an ISO 639-1 code")));
            }
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
