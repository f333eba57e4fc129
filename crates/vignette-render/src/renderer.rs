//! Format-scoped template renderer.
//!
//! A [`Renderer`] owns the compiled template tree for one output format:
//! construction walks the configured search paths, reads every matching
//! template and compiles it into the engine. Construction is the expensive
//! step; callers are expected to build a renderer once per format and reuse
//! it (rendering is a cheap `&self` operation).
//!
//! # Directory scoping
//!
//! [`Renderer::chdir`] derives a renderer whose lookups are scoped to a
//! subdirectory: `renderer.chdir("users/show").template("_row", ..)` tries
//! `users/show/_row` first and falls back to `_row` at the tree root. The
//! derived renderer shares the compiled tree with its parent; the parent is
//! not mutated.

use std::fmt;
use std::fs;
use std::sync::Arc;

use minijinja::value::Value;
use serde::Serialize;

use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::RenderError;
use crate::options::RendererOptions;
use crate::path::TemplatePath;
use crate::registry::FormatRegistry;

/// A renderer with a pre-compiled template tree for one format.
///
/// Cheap to clone; clones share the compiled tree.
///
/// # Example
///
/// ```rust,no_run
/// use vignette_render::{Renderer, RendererOptions, TemplatePath};
/// use minijinja::value::Value;
///
/// let paths = [TemplatePath::new("./templates")];
/// let renderer = Renderer::new(&paths, "html", &RendererOptions::new())?;
///
/// // Renders ./templates/greeting.html.jinja
/// let output = renderer.template("greeting", &Value::from_iter([("name", "Ada")]))?;
/// # Ok::<(), vignette_render::RenderError>(())
/// ```
#[derive(Clone)]
pub struct Renderer {
    inner: Arc<Inner>,
    dir: Option<String>,
}

struct Inner {
    engine: Box<dyn TemplateEngine>,
    format: String,
    template_count: usize,
}

impl Renderer {
    /// Builds a renderer for `format` over the given search paths.
    ///
    /// Walks every path, compiling each discovered `.<format>.*` template.
    /// Earlier paths win name collisions (see
    /// [`FormatRegistry`](crate::FormatRegistry)).
    ///
    /// # Errors
    ///
    /// Fails if a search path is missing, a template cannot be read, an
    /// option is invalid, or a template has a syntax error.
    pub fn new(
        paths: &[TemplatePath],
        format: &str,
        options: &RendererOptions,
    ) -> Result<Self, RenderError> {
        let engine = MiniJinjaEngine::with_options(&options.merged_with_defaults())?;
        Self::with_engine(paths, format, Box::new(engine))
    }

    /// Builds a renderer around a custom engine.
    ///
    /// The engine must already be configured; only template compilation
    /// happens here.
    pub fn with_engine(
        paths: &[TemplatePath],
        format: &str,
        mut engine: Box<dyn TemplateEngine>,
    ) -> Result<Self, RenderError> {
        let registry = FormatRegistry::from_paths(paths, format)?;

        for (name, path) in registry.iter() {
            let source = fs::read_to_string(path).map_err(|e| {
                RenderError::Operation(format!(
                    "failed to read template {}: {e}",
                    path.display()
                ))
            })?;
            engine.add_template(name, &source)?;
        }

        tracing::debug!(format, templates = registry.len(), "compiled template tree");

        Ok(Self {
            inner: Arc::new(Inner {
                engine,
                format: format.to_string(),
                template_count: registry.len(),
            }),
            dir: None,
        })
    }

    /// The output format this renderer was built for.
    pub fn format(&self) -> &str {
        &self.inner.format
    }

    /// The lookup directory this renderer is scoped to, if any.
    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    /// Number of templates compiled into the tree.
    pub fn template_count(&self) -> usize {
        self.inner.template_count
    }

    /// Derives a renderer scoped to a subdirectory of the current scope.
    ///
    /// Lookups on the derived renderer try `<dir>/<name>` before falling
    /// back to `<name>`. The compiled tree is shared; `self` is unchanged.
    pub fn chdir(&self, dir: &str) -> Renderer {
        let dir = match &self.dir {
            Some(current) => format!("{current}/{dir}"),
            None => dir.to_string(),
        };
        Renderer {
            inner: Arc::clone(&self.inner),
            dir: Some(dir),
        }
    }

    /// True if `name` resolves from this renderer's scope.
    pub fn has_template(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Renders the named template against the given data.
    ///
    /// `data` is converted through [`Value::from_serialize`], so any
    /// `Serialize` type works; passing a `minijinja::Value` preserves
    /// dynamic objects as-is.
    pub fn template<S: Serialize>(&self, name: &str, data: &S) -> Result<String, RenderError> {
        let resolved = self.resolve(name).ok_or_else(|| {
            RenderError::TemplateNotFound(match &self.dir {
                Some(dir) => format!("`{name}` (format: {}, dir: {dir})", self.inner.format),
                None => format!("`{name}` (format: {})", self.inner.format),
            })
        })?;
        let value = Value::from_serialize(data);
        self.inner.engine.render_named(&resolved, &value)
    }

    /// Resolves a name within the current scope, falling back to the root.
    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(dir) = &self.dir {
            let scoped = format!("{dir}/{name}");
            if self.inner.engine.has_template(&scoped) {
                return Some(scoped);
            }
        }
        self.inner
            .engine
            .has_template(name)
            .then(|| name.to_string())
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("format", &self.inner.format)
            .field("dir", &self.dir)
            .field("templates", &self.inner.template_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_template_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&full_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn renderer_for(dir: &TempDir, format: &str) -> Renderer {
        Renderer::new(
            &[TemplatePath::new(dir.path())],
            format,
            &RendererOptions::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_compiled_template() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "greeting.html.jinja", "Hello, {{ name }}!");

        let renderer = renderer_for(&dir, "html");
        let output = renderer
            .template("greeting", &Value::from_iter([("name", "Ada")]))
            .unwrap();
        assert_eq!(output, "Hello, Ada!");
    }

    #[test]
    fn test_format_scoping() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "greeting.html.jinja", "<p>hi</p>");
        create_template_file(dir.path(), "greeting.txt.jinja", "hi");

        let html = renderer_for(&dir, "html");
        let txt = renderer_for(&dir, "txt");

        let empty = Value::from_iter(std::iter::empty::<(String, Value)>());
        assert_eq!(html.template("greeting", &empty).unwrap(), "<p>hi</p>");
        assert_eq!(txt.template("greeting", &empty).unwrap(), "hi");
    }

    #[test]
    fn test_unknown_template_error() {
        let dir = TempDir::new().unwrap();
        let renderer = renderer_for(&dir, "html");

        let result = renderer.template("missing", &Value::UNDEFINED);
        assert!(matches!(result, Err(RenderError::TemplateNotFound(_))));
    }

    #[test]
    fn test_chdir_scoped_lookup_with_root_fallback() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "users/show/_info.html.jinja", "scoped");
        create_template_file(dir.path(), "_shared.html.jinja", "root");

        let renderer = renderer_for(&dir, "html");
        let scoped = renderer.chdir("users/show");

        let empty = Value::UNDEFINED;
        assert_eq!(scoped.template("_info", &empty).unwrap(), "scoped");
        // Not present under users/show; resolved from the tree root.
        assert_eq!(scoped.template("_shared", &empty).unwrap(), "root");
    }

    #[test]
    fn test_chdir_does_not_mutate_original() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "layouts/app.html.jinja", "layout");

        let renderer = renderer_for(&dir, "html");
        let derived = renderer.chdir("layouts");

        assert_eq!(renderer.dir(), None);
        assert_eq!(derived.dir(), Some("layouts"));
        assert!(derived.has_template("app"));
        assert!(!renderer.has_template("app"));
    }

    #[test]
    fn test_chdir_nests() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "a/b/leaf.html.jinja", "leaf");

        let renderer = renderer_for(&dir, "html").chdir("a").chdir("b");
        assert_eq!(renderer.dir(), Some("a/b"));
        assert!(renderer.has_template("leaf"));
    }

    #[test]
    fn test_includes_resolve_across_the_tree() {
        let dir = TempDir::new().unwrap();
        create_template_file(
            dir.path(),
            "page.html.jinja",
            "Before {% include 'users/_row' %} After",
        );
        create_template_file(dir.path(), "users/_row.html.jinja", "ROW");

        let renderer = renderer_for(&dir, "html");
        let output = renderer.template("page", &Value::UNDEFINED).unwrap();
        assert_eq!(output, "Before ROW After");
    }

    #[test]
    fn test_no_escaping_by_default() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "raw.html.jinja", "{{ body }}");

        let renderer = renderer_for(&dir, "html");
        let output = renderer
            .template("raw", &Value::from_iter([("body", "<b>bold</b>")]))
            .unwrap();
        assert_eq!(output, "<b>bold</b>");
    }
}
