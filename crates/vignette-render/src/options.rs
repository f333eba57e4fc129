//! Renderer construction options.
//!
//! [`RendererOptions`] is a string-keyed option map handed to the engine at
//! renderer construction. User-supplied options are merged **into** the
//! built-in defaults rather than replacing them: every key of
//! [`DEFAULT_RENDERER_OPTIONS`] is present in the effective set unless the
//! caller explicitly overrides it.
//!
//! Recognized keys (interpreted by [`MiniJinjaEngine`](crate::MiniJinjaEngine)):
//!
//! | Key | Values | Default |
//! |-----|--------|---------|
//! | `auto_escape` | `"none"`, `"html"` | `"none"` |
//! | `undefined_behavior` | `"lenient"`, `"strict"`, `"chainable"` | engine default |
//! | `keep_trailing_newline` | `true`, `false` | engine default |
//!
//! Unrecognized keys are rejected at engine construction with
//! [`RenderError::InvalidOption`](crate::RenderError::InvalidOption).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// The built-in option set every renderer starts from.
///
/// Escaping is off by default: this library renders markup, and escaping
/// policy belongs to the host application's templates.
pub static DEFAULT_RENDERER_OPTIONS: Lazy<RendererOptions> =
    Lazy::new(|| RendererOptions::new().set("auto_escape", "none"));

/// String-keyed engine options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererOptions {
    entries: BTreeMap<String, serde_json::Value>,
}

impl RendererOptions {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, returning the updated set.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Looks up an option value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Returns this set layered over [`DEFAULT_RENDERER_OPTIONS`].
    ///
    /// Keys present here win; default keys not overridden are carried
    /// through unchanged.
    pub fn merged_with_defaults(&self) -> Self {
        let mut merged = DEFAULT_RENDERER_OPTIONS.clone();
        for (key, value) in &self.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Iterates over `(key, value)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RendererOptions
where
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
