use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key under which a nested translation map stores its own label.
pub const NAME_KEY: &str = "_name";

/// Flat key -> label fallback shared by all models.
pub type GenericTranslations = BTreeMap<String, String>;

/// One entry of a translation tree.
///
/// Anything that is not a string, a list of strings or a nested map is kept
/// as `Unsupported` so a malformed dictionary still loads; such entries never
/// produce a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationEntry {
    Label(String),
    Labels(Vec<String>),
    Nested(TranslationMap),
    Unsupported(serde_json::Value),
}

impl TranslationEntry {
    /// The display string this entry resolves to, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            TranslationEntry::Label(label) => Some(label.as_str()),
            TranslationEntry::Labels(labels) => labels.first().map(String::as_str),
            TranslationEntry::Nested(map) => map.name(),
            TranslationEntry::Unsupported(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&TranslationMap> {
        match self {
            TranslationEntry::Nested(map) => Some(map),
            _ => None,
        }
    }
}

/// Translation tree mirroring the shape of the data it labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationMap(BTreeMap<String, TranslationEntry>);

impl TranslationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: TranslationEntry) {
        self.0.insert(key.into(), entry);
    }

    /// This map's own label (`_name`), when it is a string
    pub fn name(&self) -> Option<&str> {
        match self.0.get(NAME_KEY) {
            Some(TranslationEntry::Label(label)) => Some(label.as_str()),
            _ => None,
        }
    }

    /// Sub-tree for `key`, only when the entry at `key` is itself a map
    pub fn child(&self, key: &str) -> Option<&TranslationMap> {
        self.0.get(key).and_then(TranslationEntry::as_map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deep merge `other` into `self`. Nested maps merge recursively, any
    /// other collision is won by `other`.
    pub fn merge(&mut self, other: TranslationMap) {
        for (key, incoming) in other.0 {
            match (self.0.get_mut(&key), incoming) {
                (Some(TranslationEntry::Nested(existing)), TranslationEntry::Nested(nested)) => {
                    existing.merge(nested);
                }
                (_, incoming) => {
                    self.0.insert(key, incoming);
                }
            }
        }
    }
}

/// Resolve the display label for `key`.
///
/// Precedence: the model-specific entry (string, nested `_name`, first list
/// element), then the generic fallback, then the raw key.
pub fn translate_key<'a>(
    key: &'a str,
    translations: Option<&'a TranslationMap>,
    generic: Option<&'a GenericTranslations>,
) -> &'a str {
    if let Some(label) = translations
        .and_then(|map| map.get(key))
        .and_then(TranslationEntry::label)
    {
        return label;
    }

    if let Some(label) = generic.and_then(|map| map.get(key)).map(String::as_str) {
        return label;
    }

    key
}

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Failed to read translations from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translations from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// All translation dictionaries the renderer needs, built once at startup.
///
/// `models` maps a backend model name (`event`, `user`, ...) to its tree;
/// `generic` is the flat fallback for keys no model translates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationCatalog {
    #[serde(default)]
    pub models: BTreeMap<String, TranslationMap>,
    #[serde(default)]
    pub generic: GenericTranslations,
}

impl TranslationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merge a model tree into the catalog
    pub fn add_model(&mut self, model: impl Into<String>, tree: TranslationMap) {
        let model = model.into();
        match self.models.get_mut(&model) {
            Some(existing) => existing.merge(tree),
            None => {
                self.models.insert(model, tree);
            }
        }
    }

    pub fn add_generic(&mut self, generic: GenericTranslations) {
        self.generic.extend(generic);
    }

    /// Merge another catalog into this one; `other` wins on collisions
    pub fn merge(&mut self, other: TranslationCatalog) {
        for (model, tree) in other.models {
            self.add_model(model, tree);
        }
        self.add_generic(other.generic);
    }

    pub fn model(&self, model: &str) -> Option<&TranslationMap> {
        self.models.get(model)
    }

    pub fn generic(&self) -> &GenericTranslations {
        &self.generic
    }

    /// Label of a model itself, e.g. "Akce" for `event`
    pub fn model_label<'a>(&'a self, model: &'a str) -> &'a str {
        self.model(model).and_then(TranslationMap::name).unwrap_or(model)
    }

    /// Load a JSON object of `model -> translation tree` and merge it in
    pub fn load_models_file(&mut self, path: &Path) -> Result<(), TranslationError> {
        let models: BTreeMap<String, TranslationMap> = read_json(path)?;
        debug!(path = %path.display(), count = models.len(), "Loaded model translations");
        for (model, tree) in models {
            self.add_model(model, tree);
        }
        Ok(())
    }

    /// Load a flat JSON object of `key -> label` into the generic fallback
    pub fn load_generic_file(&mut self, path: &Path) -> Result<(), TranslationError> {
        let generic: GenericTranslations = read_json(path)?;
        debug!(path = %path.display(), count = generic.len(), "Loaded generic translations");
        self.add_generic(generic);
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TranslationError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TranslationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| TranslationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
