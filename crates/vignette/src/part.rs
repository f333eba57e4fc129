//! Value decoration for template-friendly presentation.
//!
//! A [`Part`] wraps an exposed value for rendering: templates can keep
//! reading the value's attributes through it, and additionally ask the part
//! to render a partial with itself in scope. Decoration happens while
//! locals are resolved, through the configured [`PartBuilder`].
//!
//! Builders are only ever invoked for present (truthy) values; falsy values
//! pass through rendering undecorated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, Value, ValueKind};
use minijinja::ErrorKind;
use vignette_render::Renderer;

use crate::context::Context;
use crate::error::Error;
use crate::inflector::Inflector;
use crate::scope::merge_pairs;

/// Everything a part builder needs to decorate one value.
pub struct PartArgs<'a> {
    /// The exposure name the value was resolved under.
    pub name: &'a str,
    /// The computed (present) value.
    pub value: Value,
    /// Renderer scoped to the template's own directory.
    pub renderer: &'a Renderer,
    /// The bound rendering context of the call.
    pub context: &'a Context,
    /// Partial lookup prefix for parts, from the configuration.
    pub namespace: Option<&'a str>,
    /// Naming helper, from the configuration.
    pub inflector: &'a Inflector,
    /// The exposure's free-form extra options.
    pub options: &'a BTreeMap<String, serde_json::Value>,
}

/// Builds decorated values. Swap the implementation on the view definition
/// to customize decoration globally.
pub trait PartBuilder: Send + Sync + fmt::Debug {
    fn build(&self, args: PartArgs<'_>) -> Result<Value, Error>;
}

/// The default decoration policy.
///
/// Sequences are decorated element-wise: each element becomes a [`Part`]
/// named with the singularized exposure name (`users` → parts named
/// `user`), and the collection itself stays a sequence. Everything else is
/// wrapped in a single [`Part`] under the exposure name.
#[derive(Debug, Clone, Default)]
pub struct DefaultPartBuilder;

impl PartBuilder for DefaultPartBuilder {
    fn build(&self, args: PartArgs<'_>) -> Result<Value, Error> {
        if args.value.kind() == ValueKind::Seq {
            let element_name = args.inflector.singularize(args.name);
            let iter = args
                .value
                .try_iter()
                .map_err(|e| Error::Render(e.into()))?;
            let parts: Vec<Value> = iter
                .map(|item| {
                    Value::from_object(Part::new(
                        &element_name,
                        item,
                        args.renderer.clone(),
                        args.context,
                        args.namespace,
                    ))
                })
                .collect();
            Ok(Value::from(parts))
        } else {
            Ok(Value::from_object(Part::new(
                args.name,
                args.value,
                args.renderer.clone(),
                args.context,
                args.namespace,
            )))
        }
    }
}

/// A part builder paired with the configuration it needs, constructed once
/// per view instance.
#[derive(Debug, Clone)]
pub struct BoundPartBuilder {
    inner: Arc<dyn PartBuilder>,
    namespace: Option<String>,
    inflector: Inflector,
}

impl BoundPartBuilder {
    pub fn new(inner: Arc<dyn PartBuilder>, namespace: Option<String>, inflector: Inflector) -> Self {
        Self {
            inner,
            namespace,
            inflector,
        }
    }

    /// Decorates one value through the configured builder.
    pub fn call(
        &self,
        name: &str,
        value: Value,
        renderer: &Renderer,
        context: &Context,
        options: &BTreeMap<String, serde_json::Value>,
    ) -> Result<Value, Error> {
        self.inner.build(PartArgs {
            name,
            value,
            renderer,
            context,
            namespace: self.namespace.as_deref(),
            inflector: &self.inflector,
            options,
        })
    }
}

/// A decorated value.
///
/// Inside templates a part behaves like the value it wraps - attribute
/// access and display delegate to it - with two extras:
///
/// - `part.value` / `part.name` return the raw value and the part's name;
/// - `part.render("info")` renders the partial `_info` (under the part
///   namespace when one is configured), with the part bound under its own
///   name and the call's context values in scope. Lookup starts in the
///   template's directory and falls back to the template-tree root.
#[derive(Clone)]
pub struct Part {
    name: String,
    value: Value,
    renderer: Renderer,
    context_values: Vec<(String, Value)>,
    namespace: Option<String>,
}

impl Part {
    pub fn new(
        name: impl Into<String>,
        value: Value,
        renderer: Renderer,
        context: &Context,
        namespace: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            renderer,
            context_values: context
                .pairs()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    fn partial_name(&self, partial: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}/_{partial}"),
            None => format!("_{partial}"),
        }
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl Object for Part {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str() {
            Some("value") => Some(self.value.clone()),
            Some("name") => Some(Value::from(self.name.clone())),
            Some(attr) => self.value.get_attr(attr).ok().filter(|v| !v.is_undefined()),
            None => self.value.get_item(key).ok().filter(|v| !v.is_undefined()),
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        match self.value.try_iter() {
            Ok(iter) => Enumerator::Values(iter.collect()),
            Err(_) => Enumerator::NonEnumerable,
        }
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &minijinja::State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, minijinja::Error> {
        match method {
            "render" => {
                let partial = args
                    .first()
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        minijinja::Error::new(
                            ErrorKind::InvalidOperation,
                            "render expects a partial name",
                        )
                    })?;

                let mut pairs = self.context_values.clone();
                pairs.push((self.name.clone(), Value::from_object(Part::clone(self))));

                let output = self
                    .renderer
                    .template(&self.partial_name(partial), &merge_pairs(pairs))
                    .map_err(|e| {
                        minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())
                    })?;
                Ok(Value::from_safe_string(output))
            }
            other => Err(minijinja::Error::new(
                ErrorKind::UnknownMethod,
                format!("part has no method named {other}"),
            )),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        write!(f, "{}", self.value)
    }
}
