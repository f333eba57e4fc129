//! The rendering context shared by every template of a render call.
//!
//! A [`Context`] carries named values that templates can read alongside the
//! locals (locals win name collisions). At the start of each render call
//! the view *binds* the context: [`Context::bind`] is a pure transformation
//! producing a derived context that additionally holds the call's part
//! builder and renderer, so context consumers can decorate values eagerly.
//! The configured default context is never mutated; every call derives its
//! own bound copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::value::Value;
use serde::Serialize;
use vignette_render::Renderer;

use crate::error::Error;
use crate::part::BoundPartBuilder;

#[derive(Debug, Clone)]
struct Binding {
    part_builder: Arc<BoundPartBuilder>,
    renderer: Renderer,
}

/// Named values available to every template of a render call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: BTreeMap<String, Value>,
    binding: Option<Binding>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value, returning the updated context.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        self.values.insert(name.into(), Value::from_serialize(&value));
        self
    }

    /// Looks up a context value.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterates `(name, value)` entries.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Derives a context bound to a render call's part builder and
    /// renderer. `self` is unchanged; the values are shared into the
    /// derived context.
    pub fn bind(&self, part_builder: Arc<BoundPartBuilder>, renderer: Renderer) -> Context {
        Context {
            values: self.values.clone(),
            binding: Some(Binding {
                part_builder,
                renderer,
            }),
        }
    }

    /// True once the context has been bound into a render call.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The renderer of the call this context is bound to.
    pub fn renderer(&self) -> Option<&Renderer> {
        self.binding.as_ref().map(|b| &b.renderer)
    }

    /// Eagerly decorates a value into a part.
    ///
    /// Follows the same presence rule as exposure decoration: a falsy value
    /// is returned untouched. Fails with [`Error::UnboundContext`] outside
    /// a render call.
    pub fn part(&self, name: &str, value: impl Serialize) -> Result<Value, Error> {
        let value = Value::from_serialize(&value);
        if !value.is_true() {
            return Ok(value);
        }
        let binding = self.binding.as_ref().ok_or(Error::UnboundContext)?;
        binding
            .part_builder
            .call(name, value, &binding.renderer, self, &BTreeMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflector::Inflector;
    use crate::part::DefaultPartBuilder;
    use vignette_render::RendererOptions;

    fn bound_context() -> Context {
        let part_builder = Arc::new(BoundPartBuilder::new(
            Arc::new(DefaultPartBuilder),
            None,
            Inflector::default(),
        ));
        let renderer = Renderer::new(&[], "html", &RendererOptions::new()).unwrap();
        Context::new().bind(part_builder, renderer)
    }

    #[test]
    fn test_values_round_trip() {
        let context = Context::new()
            .with_value("app_name", "demo")
            .with_value("version", 3);
        assert_eq!(context.value("app_name"), Some(&Value::from("demo")));
        assert_eq!(context.pairs().count(), 2);
    }

    #[test]
    fn test_bind_derives_without_mutating() {
        let original = Context::new().with_value("k", 1);
        let bound = original.bind(
            Arc::new(BoundPartBuilder::new(
                Arc::new(DefaultPartBuilder),
                None,
                Inflector::default(),
            )),
            Renderer::new(&[], "html", &RendererOptions::new()).unwrap(),
        );

        assert!(!original.is_bound());
        assert!(bound.is_bound());
        assert_eq!(bound.value("k"), Some(&Value::from(1)));
    }

    #[test]
    fn test_part_requires_binding() {
        let result = Context::new().part("user", "ada");
        assert!(matches!(result, Err(Error::UnboundContext)));
    }

    #[test]
    fn test_part_decorates_present_values() {
        let part = bound_context().part("user", "ada").unwrap();
        assert_eq!(part.get_attr("name").unwrap(), Value::from("user"));
        assert_eq!(part.get_attr("value").unwrap(), Value::from("ada"));
    }

    #[test]
    fn test_part_passes_falsy_values_through() {
        let context = bound_context();
        let value = context.part("user", Option::<&str>::None).unwrap();
        assert!(!value.is_true());
    }
}
