//! View configuration.
//!
//! A [`Config`] is the frozen settings set shared by every instance built
//! from one view definition. Settings are written through the definition's
//! builder methods (see [`ViewDefinition`](crate::ViewDefinition)); once an
//! instance is built, it holds a read-only snapshot.

use std::sync::Arc;

use vignette_render::{RendererOptions, TemplatePath, DEFAULT_RENDERER_OPTIONS};

use crate::context::Context;
use crate::inflector::Inflector;
use crate::part::{DefaultPartBuilder, PartBuilder};
use crate::scope::{DefaultScopeBuilder, ScopeBuilder};

/// The named settings of one view definition.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered template search paths.
    pub(crate) paths: Vec<TemplatePath>,
    /// Layout identifier; `None` disables layout composition.
    pub(crate) layout: Option<String>,
    /// Template identifier; required before the view can render.
    pub(crate) template: Option<String>,
    /// Output format used when a request names none.
    pub(crate) default_format: String,
    /// Engine options, always carrying the built-in defaults underneath.
    pub(crate) renderer_options: RendererOptions,
    /// Context used when a request supplies none.
    pub(crate) default_context: Context,
    pub(crate) part_builder: Arc<dyn PartBuilder>,
    pub(crate) part_namespace: Option<String>,
    pub(crate) scope_builder: Arc<dyn ScopeBuilder>,
    pub(crate) scope_name: Option<String>,
    pub(crate) scope_namespace: Option<String>,
    pub(crate) inflector: Inflector,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            layout: None,
            template: None,
            default_format: "html".to_string(),
            renderer_options: DEFAULT_RENDERER_OPTIONS.clone(),
            default_context: Context::new(),
            part_builder: Arc::new(DefaultPartBuilder),
            part_namespace: None,
            scope_builder: Arc::new(DefaultScopeBuilder),
            scope_name: None,
            scope_namespace: None,
            inflector: Inflector::default(),
        }
    }
}

impl Config {
    pub fn paths(&self) -> &[TemplatePath] {
        &self.paths
    }

    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    pub fn renderer_options(&self) -> &RendererOptions {
        &self.renderer_options
    }

    pub fn default_context(&self) -> &Context {
        &self.default_context
    }

    pub fn part_namespace(&self) -> Option<&str> {
        self.part_namespace.as_deref()
    }

    pub fn scope_name(&self) -> Option<&str> {
        self.scope_name.as_deref()
    }

    pub fn scope_namespace(&self) -> Option<&str> {
        self.scope_namespace.as_deref()
    }

    pub fn inflector(&self) -> &Inflector {
        &self.inflector
    }
}
