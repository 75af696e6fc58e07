//! Translation table: the resolved key→string mapping for one language.
//!
//! Tables are nested JSON objects addressed by dot-separated key paths
//! ("contact.form.send"). Lookup never fails: a missing path or a non-string
//! terminal resolves to the key itself, so untranslated UI degrades to
//! showing its keys instead of blanking out.

use serde_json::Value;

use crate::error::LoadError;

/// Immutable key→string mapping for one language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationTable {
    root: Value,
}

impl TranslationTable {
    /// Table with no entries; every lookup echoes the key back.
    pub fn empty() -> Self {
        Self { root: Value::Null }
    }

    /// Parse a fetched translation document. The payload must be a JSON
    /// object; `url` is only used for error reporting.
    pub fn parse(payload: &str, url: &str) -> Result<Self, LoadError> {
        let root: Value = serde_json::from_str(payload).map_err(|source| LoadError::Parse {
            url: url.to_string(),
            source,
        })?;
        if !root.is_object() {
            // Not an object means not a translation document. Surface it the
            // same way as malformed JSON.
            return Err(LoadError::Parse {
                url: url.to_string(),
                source: <serde_json::Error as serde::de::Error>::custom(
                    "translation document must be a JSON object",
                ),
            });
        }
        Ok(Self { root })
    }

    /// Build a table directly from a JSON value (tests, embedded defaults).
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Resolve a dot-separated key path.
    ///
    /// Returns the key itself when any path segment is missing or the
    /// terminal value is not a string. An empty key resolves to the empty
    /// string; a terminal empty string is returned as-is.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        if key.is_empty() {
            return "";
        }
        let mut node = &self.root;
        for segment in key.split('.') {
            match node.get(segment) {
                Some(next) => node = next,
                None => return key,
            }
        }
        node.as_str().unwrap_or(key)
    }

    /// Whether the table resolves `key` to something other than itself.
    pub fn contains(&self, key: &str) -> bool {
        !key.is_empty() && self.get(key) != key
    }

    /// True for the empty table.
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Object(map) => map.is_empty(),
            _ => true,
        }
    }
}
