//! # Vignette - View Rendering with Exposures, Parts and Layouts
//!
//! `vignette` turns a request-like set of named inputs into a finished
//! output string plus the resolved locals that produced it. A render call
//! runs three phases: compute exposed values from the input, wrap them into
//! render-friendly parts and a scope, and feed the scope into the template
//! engine - optionally nesting the result inside a layout.
//!
//! ## Core Concepts
//!
//! - [`ViewDefinition`]: configuration plus exposure declarations; derive
//!   child definitions that inherit a snapshot of the parent's settings
//! - [`View`]: a reusable instance built from a definition; one
//!   [`render`](View::render) call per output
//! - Exposure: a named computation producing one local from the input (and
//!   possibly earlier locals)
//! - [`Part`]: a decorated wrapper around an exposed value, for
//!   template-friendly presentation
//! - [`Scope`]: the binding object a template is evaluated against
//! - Layout: an outer template that embeds the primary template's output
//!   as `content`
//! - [`Rendered`]: the final output string plus the full [`Locals`] map
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vignette::{Request, ViewDefinition};
//!
//! let view = ViewDefinition::new()
//!     .path("./templates")
//!     .template("greeting")
//!     .expose_input(&["name"])
//!     .build();
//!
//! // Renders ./templates/greeting.html.jinja with `name` in scope.
//! let rendered = view.render(Request::new().with("name", "Ada"))?;
//! println!("{}", rendered.output());
//! # Ok::<(), vignette::Error>(())
//! ```
//!
//! ## Exposures
//!
//! Exposures resolve in registration order, and later computations can read
//! the locals resolved before them:
//!
//! ```rust,no_run
//! use minijinja::value::Value;
//! use vignette::{ExposureOptions, ViewDefinition};
//!
//! let definition = ViewDefinition::new()
//!     .path("./templates")
//!     .template("users/show")
//!     // Reads the `user` input key, decorates it into a part, and marks
//!     // it layout-eligible.
//!     .expose_input_with(
//!         &["user"],
//!         ExposureOptions {
//!             layout: true,
//!             ..ExposureOptions::default()
//!         },
//!     )
//!     // Computed from the input and the locals resolved so far.
//!     .expose("title", |_, locals| {
//!         let user = locals.get("user").cloned().unwrap_or_default();
//!         Ok(Value::from(format!("Profile: {user}")))
//!     });
//! ```
//!
//! ## Layouts
//!
//! With `.layout("app")`, the output of the primary template is rendered
//! again inside `layouts/app`, which embeds it wherever it places
//! `{{ content }}`. Only layout-eligible locals reach the layout's scope;
//! the returned [`Rendered`] always carries the full locals map.

mod config;
mod context;
mod error;
mod exposures;
mod inflector;
mod input;
mod locals;
mod part;
mod rendered;
mod scope;
mod view;

pub use config::Config;
pub use context::Context;
pub use error::Error;
pub use exposures::{BoundExposures, Computation, Exposure, ExposureFn, ExposureOptions, Exposures};
pub use inflector::Inflector;
pub use input::{Input, Request};
pub use locals::{LocalEntry, Locals};
pub use part::{BoundPartBuilder, DefaultPartBuilder, Part, PartArgs, PartBuilder};
pub use rendered::Rendered;
pub use scope::{BoundScopeBuilder, DefaultScopeBuilder, Scope, ScopeArgs, ScopeBuilder};
pub use view::{RendererCache, View, ViewDefinition, DEFAULT_LAYOUTS_DIR};

// The renderer layer is part of the public surface: custom part and scope
// builders receive `Renderer` values, and options/paths are configured
// through these types.
pub use vignette_render::{
    MiniJinjaEngine, RenderError, Renderer, RendererOptions, TemplateEngine, TemplatePath,
    DEFAULT_RENDERER_OPTIONS,
};
