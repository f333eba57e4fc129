//! View definitions, instances, and the rendering orchestration.
//!
//! A [`ViewDefinition`] plays the role a view class plays in classic MVC
//! frameworks: it owns the configuration, the exposure registry and the
//! per-format renderer cache. [`ViewDefinition::derive`] snapshots a
//! definition into a child that starts from the parent's current settings
//! and exposures - the moment of derivation decides what is inherited;
//! nothing is imported retroactively.
//!
//! [`ViewDefinition::build`] produces a [`View`] instance: exposures bound,
//! part/scope builders configured, renderer cache shared with the
//! definition (and with every other instance built from it).
//!
//! # Rendering
//!
//! [`View::render`] drives the full sequence for one call:
//!
//! 1. fail fast if no template is configured;
//! 2. fetch (or lazily construct) the renderer for the request format;
//! 3. bind the part builder and renderer into the request context;
//! 4. resolve locals in exposure registration order, decorating present
//!    values whose exposure asks for it;
//! 5. build the template scope and render the template;
//! 6. when a layout is configured, render `layouts/<name>` around the
//!    output with the layout-eligible subset of the locals;
//! 7. return the output together with the full locals map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vignette_render::{Renderer, RendererOptions, TemplatePath};

use crate::config::Config;
use crate::context::Context;
use crate::error::Error;
use crate::exposures::{BoundExposures, Exposure, ExposureOptions, Exposures};
use crate::inflector::Inflector;
use crate::input::{Input, Request};
use crate::locals::Locals;
use crate::part::{BoundPartBuilder, PartBuilder};
use crate::rendered::Rendered;
use crate::scope::{BoundScopeBuilder, ScopeBuilder};

use minijinja::value::Value;

/// Directory under the search paths where layout templates live.
pub const DEFAULT_LAYOUTS_DIR: &str = "layouts";

/// Lazily-populated map from output format to constructed renderer.
///
/// Owned by a [`ViewDefinition`] and shared by every instance built from
/// it. Construction is serialized under the lock: at most one renderer is
/// ever constructed per format, and a populated slot is never replaced, so
/// every reader of a populated slot observes the same immutable renderer.
#[derive(Debug, Default)]
pub struct RendererCache {
    slots: Mutex<HashMap<String, Arc<Renderer>>>,
}

impl RendererCache {
    fn fetch(
        &self,
        format: &str,
        build: impl FnOnce() -> Result<Renderer, vignette_render::RenderError>,
    ) -> Result<Arc<Renderer>, Error> {
        let mut slots = match self.slots.lock() {
            Ok(guard) => guard,
            // A poisoned lock means a concurrent constructor panicked.
            // Slots are only ever inserted fully built, so the map itself
            // is still coherent; recover it rather than surfacing the race.
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(renderer) = slots.get(format) {
            return Ok(Arc::clone(renderer));
        }

        tracing::debug!(format, "constructing renderer");
        let renderer = Arc::new(build()?);
        slots.insert(format.to_string(), Arc::clone(&renderer));
        Ok(renderer)
    }

    /// The formats a renderer has been constructed for, sorted.
    pub fn cached_formats(&self) -> Vec<String> {
        let slots = match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut formats: Vec<String> = slots.keys().cloned().collect();
        formats.sort();
        formats
    }

    pub fn len(&self) -> usize {
        match self.slots.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The declarable side of a view: configuration plus exposures.
///
/// # Example
///
/// ```rust,ignore
/// let definition = ViewDefinition::new()
///     .path("./templates")
///     .template("users/show")
///     .layout("app")
///     .expose_input(&["user"])
///     .expose("title", |input, _| {
///         Ok(Value::from("User details"))
///     });
///
/// let view = definition.build();
/// let rendered = view.render(Request::new().with("user", user))?;
/// ```
pub struct ViewDefinition {
    config: Config,
    exposures: Exposures,
    renderers: Arc<RendererCache>,
}

impl Default for ViewDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewDefinition {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            exposures: Exposures::new(),
            renderers: Arc::new(RendererCache::default()),
        }
    }

    /// Derives a child definition from this one.
    ///
    /// The child is seeded with a snapshot of the current settings and the
    /// currently-registered exposures; exposures added to (or replaced on)
    /// this definition afterwards do not reach the child. The child gets
    /// its own empty renderer cache.
    pub fn derive(&self) -> Self {
        let mut exposures = Exposures::new();
        for exposure in self.exposures.iter() {
            exposures.add(exposure.clone());
        }
        Self {
            config: self.config.clone(),
            exposures,
            renderers: Arc::new(RendererCache::default()),
        }
    }

    // --- settings ---------------------------------------------------------

    /// Appends one template search path.
    pub fn path(mut self, path: impl Into<TemplatePath>) -> Self {
        self.config.paths.push(path.into());
        self
    }

    /// Replaces the template search paths.
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<TemplatePath>,
    {
        self.config.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Enables layout composition with the given layout name.
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.config.layout = Some(layout.into());
        self
    }

    /// Disables layout composition (the default).
    pub fn without_layout(mut self) -> Self {
        self.config.layout = None;
        self
    }

    /// Sets the template identifier this view renders.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.config.template = Some(template.into());
        self
    }

    /// Sets the format used when a request names none.
    pub fn default_format(mut self, format: impl Into<String>) -> Self {
        self.config.default_format = format.into();
        self
    }

    /// Sets engine options. The given options are layered over the
    /// built-in defaults, so default keys survive unless explicitly
    /// overridden.
    pub fn renderer_options(mut self, options: RendererOptions) -> Self {
        self.config.renderer_options = options.merged_with_defaults();
        self
    }

    /// Sets the context used when a request supplies none.
    pub fn default_context(mut self, context: Context) -> Self {
        self.config.default_context = context;
        self
    }

    /// Replaces the part builder.
    pub fn part_builder(mut self, builder: Arc<dyn PartBuilder>) -> Self {
        self.config.part_builder = builder;
        self
    }

    /// Sets the partial lookup prefix for parts.
    pub fn part_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.part_namespace = Some(namespace.into());
        self
    }

    /// Replaces the scope builder.
    pub fn scope_builder(mut self, builder: Arc<dyn ScopeBuilder>) -> Self {
        self.config.scope_builder = builder;
        self
    }

    /// Names the scope; the full locals also become reachable under this
    /// name in templates.
    pub fn scope_name(mut self, name: impl Into<String>) -> Self {
        self.config.scope_name = Some(name.into());
        self
    }

    /// Sets the partial lookup prefix for scopes.
    pub fn scope_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.scope_namespace = Some(namespace.into());
        self
    }

    /// Replaces the inflector used for part naming.
    pub fn inflector(mut self, inflector: Inflector) -> Self {
        self.config.inflector = inflector;
        self
    }

    // --- exposures --------------------------------------------------------

    /// Declares a computed exposure with default options.
    pub fn expose<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Input, &Locals) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.expose_with(name, ExposureOptions::default(), f)
    }

    /// Declares a computed exposure with explicit options.
    ///
    /// Redeclaring a name replaces the previous definition; instances built
    /// before the redeclaration keep their bound snapshot.
    pub fn expose_with<F>(mut self, name: &str, options: ExposureOptions, f: F) -> Self
    where
        F: Fn(&Input, &Locals) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.exposures.add(Exposure::computed(name, options, f));
        self
    }

    /// Declares one or more exposures that read their identically-named
    /// input key.
    pub fn expose_input(self, names: &[&str]) -> Self {
        self.expose_input_with(names, ExposureOptions::default())
    }

    /// Declares input-reading exposures sharing one options set.
    pub fn expose_input_with(mut self, names: &[&str], options: ExposureOptions) -> Self {
        for name in names {
            self.exposures
                .add(Exposure::from_input(*name, options.clone()));
        }
        self
    }

    /// Declares a computed exposure marked private.
    pub fn private_expose<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Input, &Locals) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.expose_with(
            name,
            ExposureOptions {
                private: true,
                ..ExposureOptions::default()
            },
            f,
        )
    }

    /// Declares private input-reading exposures.
    pub fn private_expose_input(self, names: &[&str]) -> Self {
        self.expose_input_with(
            names,
            ExposureOptions {
                private: true,
                ..ExposureOptions::default()
            },
        )
    }

    // --- introspection and instantiation ----------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn exposures(&self) -> &Exposures {
        &self.exposures
    }

    /// Builds a view instance.
    ///
    /// The instance takes a read-only snapshot of the configuration, binds
    /// the exposure registry, and constructs its part and scope builders
    /// once. The renderer cache stays shared with the definition, so all
    /// instances of one definition reuse the same renderers.
    pub fn build(&self) -> View {
        let config = Arc::new(self.config.clone());
        let part_builder = Arc::new(BoundPartBuilder::new(
            Arc::clone(&config.part_builder),
            config.part_namespace.clone(),
            config.inflector.clone(),
        ));
        let scope_builder = Arc::new(BoundScopeBuilder::new(
            Arc::clone(&config.scope_builder),
            config.scope_name.clone(),
            config.scope_namespace.clone(),
        ));

        View {
            config,
            exposures: self.exposures.bind(),
            part_builder,
            scope_builder,
            renderers: Arc::clone(&self.renderers),
        }
    }
}

/// A reusable view instance.
///
/// Immutable after construction (apart from the lazily-populated, shared
/// renderer cache); safe to call from many threads concurrently. All
/// per-call state is local to [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct View {
    config: Arc<Config>,
    exposures: BoundExposures,
    part_builder: Arc<BoundPartBuilder>,
    scope_builder: Arc<BoundScopeBuilder>,
    renderers: Arc<RendererCache>,
}

impl View {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The formats this view's definition has constructed renderers for.
    pub fn cached_formats(&self) -> Vec<String> {
        self.renderers.cached_formats()
    }

    /// Returns the renderer for `format`, constructing it on first use.
    ///
    /// The search paths are re-read from the configuration on every lookup;
    /// the constructed renderer is memoized per format for the lifetime of
    /// the definition. Repeated calls return the identical instance.
    pub fn renderer(&self, format: &str) -> Result<Arc<Renderer>, Error> {
        self.renderers.fetch(format, || {
            Renderer::new(self.config.paths(), format, self.config.renderer_options())
        })
    }

    /// Renders the view: resolves locals from the request input, evaluates
    /// the template, composes the layout when one is configured.
    ///
    /// Fails with [`Error::UndefinedTemplate`] before doing any work if no
    /// template is configured. Exposure, decoration, scope and engine
    /// errors propagate unchanged; there is no partial output.
    pub fn render(&self, request: Request) -> Result<Rendered, Error> {
        let (format, context, input) = request.into_parts();

        let template = self
            .config
            .template()
            .ok_or(Error::UndefinedTemplate)?
            .to_string();
        let format = format.unwrap_or_else(|| self.config.default_format().to_string());

        let renderer = self.renderer(&format)?;
        let context = context
            .unwrap_or_else(|| self.config.default_context().clone())
            .bind(Arc::clone(&self.part_builder), (*renderer).clone());

        let template_renderer = renderer.chdir(&template);
        let locals = self.exposures.resolve(&input, |value, exposure| {
            if Self::wants_decoration(exposure.decorate(), &value) {
                self.part_builder.call(
                    exposure.name(),
                    value,
                    &template_renderer,
                    &context,
                    &exposure.options().extra,
                )
            } else {
                Ok(value)
            }
        })?;

        let scope =
            self.scope_builder
                .call(locals.clone(), context.clone(), template_renderer.clone());
        let mut output = renderer.template(&template, &scope.to_template_value(None))?;

        if let Some(layout) = self.config.layout() {
            let layout_scope = self.scope_builder.call(
                locals.layout_subset(),
                context,
                renderer.chdir(DEFAULT_LAYOUTS_DIR),
            );
            let layout_name = format!("{DEFAULT_LAYOUTS_DIR}/{layout}");
            output = renderer.template(&layout_name, &layout_scope.to_template_value(Some(&output)))?;
        }

        tracing::debug!(
            template = %template,
            format = %format,
            locals = locals.len(),
            "rendered view"
        );
        Ok(Rendered::new(output, locals))
    }

    /// Decoration needs both an affirmative flag and a present value.
    ///
    /// The two conditions are independent: an explicit `Some(false)` skips
    /// decoration even for present values, and a falsy value is never
    /// decorated even under `Some(true)`.
    fn wants_decoration(flag: Option<bool>, value: &Value) -> bool {
        flag != Some(false) && value.is_true()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<View>();
        assert_send_sync::<RendererCache>();
    }

    #[test]
    fn test_wants_decoration_flag_and_presence_are_independent() {
        let truthy = Value::from("x");
        let falsy = Value::from(false);

        assert!(View::wants_decoration(None, &truthy));
        assert!(View::wants_decoration(Some(true), &truthy));
        assert!(!View::wants_decoration(Some(false), &truthy));
        assert!(!View::wants_decoration(None, &falsy));
        assert!(!View::wants_decoration(Some(true), &falsy));
        assert!(!View::wants_decoration(Some(true), &Value::UNDEFINED));
    }

    #[test]
    fn test_derive_snapshots_exposures() {
        let parent = ViewDefinition::new()
            .expose_input(&["a"])
            .expose_input(&["b"]);
        let child = parent.derive();

        // Added to the parent after derivation; must not reach the child.
        let parent = parent.expose_input(&["c"]);

        let child_names: Vec<_> = child.exposures().names().collect();
        assert_eq!(child_names, vec!["a", "b"]);
        let parent_names: Vec<_> = parent.exposures().names().collect();
        assert_eq!(parent_names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_derive_snapshots_config() {
        let parent = ViewDefinition::new().template("users/show").layout("app");
        let child = parent.derive().without_layout().template("users/edit");

        assert_eq!(parent.config().template(), Some("users/show"));
        assert_eq!(parent.config().layout(), Some("app"));
        assert_eq!(child.config().template(), Some("users/edit"));
        assert_eq!(child.config().layout(), None);
    }

    #[test]
    fn test_child_override_does_not_touch_parent() {
        let parent = ViewDefinition::new().expose_input(&["a"]);
        let child = parent
            .derive()
            .expose("a", |_, _| Ok(Value::from("overridden")));

        assert_eq!(child.exposures().len(), 1);
        // The parent's definition still reads input.
        let view = parent.build();
        assert!(view.config().template().is_none());
        let bound = parent.exposures().bind();
        let input = Input::new().with("a", "raw");
        let locals = bound.resolve(&input, |v, _| Ok(v)).unwrap();
        assert_eq!(locals.get("a"), Some(&Value::from("raw")));
    }

    #[test]
    fn test_undefined_template_fails_before_cache_population() {
        let view = ViewDefinition::new().build();
        let result = view.render(Request::new());

        assert!(matches!(result, Err(Error::UndefinedTemplate)));
        assert!(view.cached_formats().is_empty());
    }

    #[test]
    fn test_instances_share_the_renderer_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("t.html.jinja"), "hi").unwrap();

        let definition = ViewDefinition::new().path(dir.path()).template("t");
        let first = definition.build();
        let second = definition.build();

        let a = first.renderer("html").unwrap();
        let b = second.renderer("html").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_renderer_is_memoized_per_format() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("t.html.jinja"), "hi").unwrap();
        std::fs::write(dir.path().join("t.txt.jinja"), "hi").unwrap();

        let view = ViewDefinition::new().path(dir.path()).template("t").build();

        let html_a = view.renderer("html").unwrap();
        let html_b = view.renderer("html").unwrap();
        let txt = view.renderer("txt").unwrap();

        assert!(Arc::ptr_eq(&html_a, &html_b));
        assert!(!Arc::ptr_eq(&html_a, &txt));
        assert_eq!(view.cached_formats(), vec!["html", "txt"]);
    }
}
