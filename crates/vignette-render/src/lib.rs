//! # Vignette Render - Format-Scoped Template Rendering
//!
//! `vignette-render` compiles and renders template trees for one output
//! format at a time. It is the rendering foundation for the `vignette` view
//! framework, but can be used independently wherever a directory of
//! templates needs to be rendered against structured data.
//!
//! ## Core Concepts
//!
//! - [`Renderer`]: walks ordered search paths once, compiles every template
//!   for its format, renders by name afterwards
//! - [`Renderer::chdir`]: cheap derived renderers scoped to a subdirectory,
//!   with root fallback - used for partials relative to a template
//! - [`RendererOptions`]: engine options merged over built-in defaults
//! - [`TemplatePath`]: normalized search-path values
//! - [`TemplateEngine`]: the backend seam; [`MiniJinjaEngine`] is the
//!   default implementation
//!
//! ## Template Naming
//!
//! Template files carry their format in the file name, before the engine
//! extension:
//!
//! ```text
//! templates/
//!   greeting.html.jinja      ->  "greeting"      (format: html)
//!   greeting.txt.jinja       ->  "greeting"      (format: txt)
//!   users/show.html.jinja    ->  "users/show"    (format: html)
//!   layouts/app.html.jinja   ->  "layouts/app"   (format: html)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vignette_render::{Renderer, RendererOptions, TemplatePath};
//! use minijinja::value::Value;
//!
//! let paths = [TemplatePath::new("./templates")];
//! let renderer = Renderer::new(&paths, "html", &RendererOptions::new())?;
//!
//! let data = Value::from_iter([("name", "Ada")]);
//! let output = renderer.template("greeting", &data)?;
//! # Ok::<(), vignette_render::RenderError>(())
//! ```

mod engine;
mod error;
mod options;
mod path;
mod registry;
mod renderer;

pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use error::RenderError;
pub use options::{RendererOptions, DEFAULT_RENDERER_OPTIONS};
pub use path::TemplatePath;
pub use registry::{walk_format_dir, FormatRegistry, TemplateFile, TEMPLATE_EXTENSIONS};
pub use renderer::Renderer;
