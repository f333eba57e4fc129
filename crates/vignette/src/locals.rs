//! Ordered locals resolved for one render call.
//!
//! A [`Locals`] map is produced fresh by each render call, in exposure
//! registration order, and is never mutated after the call returns. Each
//! entry carries the flags of the exposure that produced it, so consumers
//! can tell private bookkeeping values from documented ones and pick out
//! the layout-eligible subset.

use minijinja::value::Value;

/// One resolved local: a name, its final value, and its exposure flags.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalEntry {
    name: String,
    value: Value,
    private: bool,
    layout: bool,
}

impl LocalEntry {
    pub(crate) fn new(name: impl Into<String>, value: Value, private: bool, layout: bool) -> Self {
        Self {
            name: name.into(),
            value,
            private,
            layout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// True for locals produced by `private_expose`.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// True for locals whose exposure is layout-eligible.
    pub fn for_layout(&self) -> bool {
        self.layout
    }
}

/// Ordered name → value map handed to template evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locals {
    entries: Vec<LocalEntry>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: LocalEntry) {
        debug_assert!(
            !self.contains(entry.name()),
            "duplicate local name: {}",
            entry.name()
        );
        self.entries.push(entry);
    }

    /// Looks up a local's value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entry(name).map(LocalEntry::value)
    }

    /// Looks up a full entry by name.
    pub fn entry(&self, name: &str) -> Option<&LocalEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &LocalEntry> {
        self.entries.iter()
    }

    /// Names in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Iterates only the non-private entries.
    pub fn public_iter(&self) -> impl Iterator<Item = &LocalEntry> {
        self.entries.iter().filter(|entry| !entry.private)
    }

    /// The ordered subset of layout-eligible entries.
    pub fn layout_subset(&self) -> Locals {
        Locals {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.layout)
                .cloned()
                .collect(),
        }
    }

    /// Cloned `(name, value)` pairs, for building template data.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.value.clone()))
    }

    /// The locals as a template-facing map value.
    pub fn to_template_value(&self) -> Value {
        Value::from_iter(self.pairs())
    }
}

impl<'a> IntoIterator for &'a Locals {
    type Item = &'a LocalEntry;
    type IntoIter = std::slice::Iter<'a, LocalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
