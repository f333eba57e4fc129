//! The binding object templates are evaluated against.
//!
//! A [`Scope`] combines the locals, the bound context, and a
//! directory-scoped renderer; [`Scope::to_template_value`] flattens it into
//! the value the engine evaluates: context values first, locals over them,
//! and - for layout rendering - the embedded `content` string last.

use std::fmt;
use std::sync::Arc;

use minijinja::value::Value;
use vignette_render::Renderer;

use crate::context::Context;
use crate::error::Error;
use crate::locals::Locals;

/// Inputs to scope construction.
pub struct ScopeArgs<'a> {
    /// The configured scope name, if any.
    pub name: Option<&'a str>,
    /// Partial lookup prefix for the scope, from the configuration.
    pub namespace: Option<&'a str>,
    /// The locals this scope exposes (full set for the template scope,
    /// layout subset for the layout scope).
    pub locals: Locals,
    /// The bound context of the call.
    pub context: Context,
    /// Renderer scoped to the directory the scope renders from.
    pub renderer: Renderer,
}

/// Builds scopes. Swap the implementation on the view definition to
/// customize the binding object globally.
pub trait ScopeBuilder: Send + Sync + fmt::Debug {
    fn build(&self, args: ScopeArgs<'_>) -> Scope;
}

/// The default scope construction: a plain [`Scope`] from the arguments.
#[derive(Debug, Clone, Default)]
pub struct DefaultScopeBuilder;

impl ScopeBuilder for DefaultScopeBuilder {
    fn build(&self, args: ScopeArgs<'_>) -> Scope {
        Scope::new(args)
    }
}

/// A scope builder paired with its configured name and namespace,
/// constructed once per view instance.
#[derive(Debug, Clone)]
pub struct BoundScopeBuilder {
    inner: Arc<dyn ScopeBuilder>,
    name: Option<String>,
    namespace: Option<String>,
}

impl BoundScopeBuilder {
    pub fn new(inner: Arc<dyn ScopeBuilder>, name: Option<String>, namespace: Option<String>) -> Self {
        Self {
            inner,
            name,
            namespace,
        }
    }

    /// Builds a scope for one render step.
    pub fn call(&self, locals: Locals, context: Context, renderer: Renderer) -> Scope {
        self.inner.build(ScopeArgs {
            name: self.name.as_deref(),
            namespace: self.namespace.as_deref(),
            locals,
            context,
            renderer,
        })
    }
}

/// The binding object one template render is evaluated against.
#[derive(Debug, Clone)]
pub struct Scope {
    name: Option<String>,
    namespace: Option<String>,
    locals: Locals,
    context: Context,
    renderer: Renderer,
}

impl Scope {
    pub fn new(args: ScopeArgs<'_>) -> Self {
        Self {
            name: args.name.map(str::to_string),
            namespace: args.namespace.map(str::to_string),
            locals: args.locals,
            context: args.context,
            renderer: args.renderer,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn locals(&self) -> &Locals {
        &self.locals
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Flattens the scope into the value the engine evaluates against.
    ///
    /// Precedence, lowest to highest: context values, the named-scope map
    /// (when a scope name is configured, the full locals are additionally
    /// reachable under that name), individual locals, and finally `content`
    /// when layout content is being embedded.
    pub fn to_template_value(&self, content: Option<&str>) -> Value {
        let mut pairs: Vec<(String, Value)> = Vec::new();

        for (name, value) in self.context.pairs() {
            pairs.push((name.to_string(), value.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push((name.clone(), self.locals.to_template_value()));
        }
        pairs.extend(self.locals.pairs());
        if let Some(content) = content {
            pairs.push(("content".to_string(), Value::from_safe_string(content.to_string())));
        }

        merge_pairs(pairs)
    }

    /// Renders a partial in this scope: `_<name>`, under the scope
    /// namespace when one is configured, looked up through the scope's
    /// directory-scoped renderer.
    pub fn partial(&self, name: &str) -> Result<String, Error> {
        let partial = match &self.namespace {
            Some(ns) => format!("{ns}/_{name}"),
            None => format!("_{name}"),
        };
        Ok(self
            .renderer
            .template(&partial, &self.to_template_value(None))?)
    }
}

/// Builds a map value from pairs, later occurrences of a name overriding
/// earlier ones while keeping the first occurrence's position.
pub(crate) fn merge_pairs(pairs: Vec<(String, Value)>) -> Value {
    let mut order: Vec<String> = Vec::with_capacity(pairs.len());
    let mut merged: std::collections::HashMap<String, Value> =
        std::collections::HashMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        if !merged.contains_key(&name) {
            order.push(name.clone());
        }
        merged.insert(name, value);
    }

    let mut out: Vec<(String, Value)> = Vec::with_capacity(order.len());
    for name in order {
        if let Some(value) = merged.remove(&name) {
            out.push((name, value));
        }
    }
    Value::from_iter(out)
}
