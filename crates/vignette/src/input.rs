//! Free-form render input and the render request builder.

use std::collections::BTreeMap;

use minijinja::value::Value;
use serde::Serialize;

use crate::context::Context;

/// Named input values for one render call.
///
/// Values are converted through `Value::from_serialize`, so any `Serialize`
/// type can be passed. Exposures read from this map: a default exposure
/// reads its own name, a computed exposure receives the whole map.
#[derive(Debug, Clone, Default)]
pub struct Input {
    values: BTreeMap<String, Value>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returning the updated input.
    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        self.values.insert(name.into(), Value::from_serialize(&value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for one render call: format, context and input.
///
/// Format and context fall back to the view's configured defaults when not
/// given.
///
/// # Example
///
/// ```rust,ignore
/// let rendered = view.render(Request::new().with("name", "Ada"))?;
/// let json = view.render(Request::new().format("json").with("name", "Ada"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    format: Option<String>,
    context: Option<Context>,
    input: Input,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the view's default output format for this call.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Overrides the view's default rendering context for this call.
    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds one input value.
    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        self.input = self.input.with(name, value);
        self
    }

    /// Replaces the whole input map.
    pub fn input(mut self, input: Input) -> Self {
        self.input = input;
        self
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Option<Context>, Input) {
        (self.format, self.context, self.input)
    }
}
