//! Template engine abstraction.
//!
//! [`TemplateEngine`] is the seam between the renderer and the template
//! backend. The default implementation is [`MiniJinjaEngine`], which gives
//! full Jinja2-compatible functionality: loops, conditionals, filters and
//! includes.

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::error::RenderError;
use crate::options::RendererOptions;

/// A template engine that compiles named templates and renders them.
///
/// Engines are mutated only while a renderer is being constructed (template
/// compilation); rendering is a `&self` operation so a constructed engine
/// can be shared freely.
pub trait TemplateEngine: Send + Sync {
    /// Compiles and registers a named template.
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError>;

    /// Checks if a template with the given name has been registered.
    fn has_template(&self, name: &str) -> bool;

    /// Renders a previously registered template against the given value.
    fn render_named(&self, name: &str, data: &Value) -> Result<String, RenderError>;
}

/// MiniJinja-based template engine.
///
/// # Example
///
/// ```rust
/// use vignette_render::{MiniJinjaEngine, TemplateEngine};
/// use minijinja::value::Value;
///
/// let mut engine = MiniJinjaEngine::new();
/// engine.add_template("greeting", "Hello, {{ name }}!").unwrap();
///
/// let data = Value::from_iter([("name", "World")]);
/// let output = engine.render_named("greeting", &data).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine with the default environment settings.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Creates an engine configured by the given options.
    ///
    /// Option keys and values are validated here; an unrecognized key or a
    /// malformed value is an [`RenderError::InvalidOption`].
    pub fn with_options(options: &RendererOptions) -> Result<Self, RenderError> {
        let mut env = Environment::new();

        for (key, value) in options.iter() {
            match key {
                "auto_escape" => {
                    let escape = match value.as_str() {
                        Some("none") => AutoEscape::None,
                        Some("html") => AutoEscape::Html,
                        _ => {
                            return Err(RenderError::InvalidOption(format!(
                                "`auto_escape` must be \"none\" or \"html\", got {value}"
                            )))
                        }
                    };
                    env.set_auto_escape_callback(move |_| escape);
                }
                "undefined_behavior" => {
                    let behavior = match value.as_str() {
                        Some("lenient") => UndefinedBehavior::Lenient,
                        Some("strict") => UndefinedBehavior::Strict,
                        Some("chainable") => UndefinedBehavior::Chainable,
                        _ => {
                            return Err(RenderError::InvalidOption(format!(
                                "`undefined_behavior` must be \"lenient\", \"strict\" or \
                                 \"chainable\", got {value}"
                            )))
                        }
                    };
                    env.set_undefined_behavior(behavior);
                }
                "keep_trailing_newline" => match value.as_bool() {
                    Some(keep) => env.set_keep_trailing_newline(keep),
                    None => {
                        return Err(RenderError::InvalidOption(format!(
                            "`keep_trailing_newline` must be a boolean, got {value}"
                        )))
                    }
                },
                other => {
                    return Err(RenderError::InvalidOption(format!(
                        "unrecognized key `{other}`"
                    )))
                }
            }
        }

        Ok(Self { env })
    }

    /// The underlying MiniJinja environment, for registering custom filters
    /// or functions before templates are compiled.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn render_named(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        Ok(tmpl.render(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_named_template() {
        let mut engine = MiniJinjaEngine::new();
        engine
            .add_template("greeting", "Hello, {{ name }}!")
            .unwrap();

        let data = Value::from_iter([("name", "World")]);
        assert_eq!(engine.render_named("greeting", &data).unwrap(), "Hello, World!");
        assert!(engine.has_template("greeting"));
        assert!(!engine.has_template("missing"));
    }

    #[test]
    fn test_engine_control_flow() {
        let mut engine = MiniJinjaEngine::new();
        engine
            .add_template("list", "{% for item in items %}{{ item }},{% endfor %}")
            .unwrap();

        let data = Value::from_iter([("items", vec!["a", "b", "c"])]);
        assert_eq!(engine.render_named("list", &data).unwrap(), "a,b,c,");
    }

    #[test]
    fn test_engine_syntax_error() {
        let mut engine = MiniJinjaEngine::new();
        let result = engine.add_template("broken", "{{ unclosed");
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_engine_missing_template() {
        let engine = MiniJinjaEngine::new();
        let result = engine.render_named("missing", &Value::UNDEFINED);
        assert!(matches!(result, Err(RenderError::TemplateNotFound(_))));
    }

    #[test]
    fn test_with_options_strict_undefined() {
        let options = RendererOptions::new().set("undefined_behavior", "strict");
        let mut engine = MiniJinjaEngine::with_options(&options).unwrap();
        engine.add_template("t", "{{ missing }}").unwrap();

        let result = engine.render_named("t", &Value::from_iter([("present", 1)]));
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn test_with_options_html_escaping() {
        let options = RendererOptions::new().set("auto_escape", "html");
        let mut engine = MiniJinjaEngine::with_options(&options).unwrap();
        engine.add_template("t", "{{ body }}").unwrap();

        let data = Value::from_iter([("body", "<b>hi</b>")]);
        assert_eq!(
            engine.render_named("t", &data).unwrap(),
            "&lt;b&gt;hi&lt;/b&gt;"
        );
    }

    #[test]
    fn test_with_options_rejects_unknown_key() {
        let options = RendererOptions::new().set("default_encoding", "utf-8");
        let result = MiniJinjaEngine::with_options(&options);
        assert!(matches!(result, Err(RenderError::InvalidOption(_))));
    }

    #[test]
    fn test_with_options_rejects_bad_value() {
        let options = RendererOptions::new().set("auto_escape", 42);
        let result = MiniJinjaEngine::with_options(&options);
        assert!(matches!(result, Err(RenderError::InvalidOption(_))));
    }
}
