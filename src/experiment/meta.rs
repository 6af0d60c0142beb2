use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix marking metadata that is internal to the model and never written
/// as a visible name/value element.
pub const INTERNAL_PREFIX: char = '#';

/// Key of the free-text comment attached to instruments and processing methods
pub const COMMENT_KEY: &str = "#Comment";

/// Free-form name/value metadata attached to model objects
///
/// Keys are kept in sorted order so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaInfo {
    values: BTreeMap<String, String>,
}

impl MetaInfo {
    /// Create an empty metadata store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value under the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Remove a value, returning it if it was present
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    /// Whether a value is stored under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored entries, internal ones included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over entries that may be shown outside the model
    pub fn visible(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !is_internal_key(k))
    }
}

/// Whether a metadata key is reserved for internal use
pub fn is_internal_key(key: &str) -> bool {
    key.starts_with(INTERNAL_PREFIX)
}
