//! Error types for view rendering.

use vignette_render::RenderError;

/// Error type for view configuration and rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `render` was invoked on a view with no template configured.
    ///
    /// Raised before any renderer is constructed or any exposure computed.
    #[error("no template configured for this view")]
    UndefinedTemplate,

    /// A renderer or template engine failure, passed through unchanged.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// `Context::part` was called on a context that has not been bound
    /// into a render call.
    #[error("context is not bound to a renderer; parts can only be built during a render call")]
    UnboundContext,

    /// Free-form failure, for use by exposure computations.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a free-form error, typically from inside an exposure
    /// computation.
    pub fn message(msg: impl Into<String>) -> Self {
        Error::Message(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_template_display() {
        assert!(Error::UndefinedTemplate.to_string().contains("no template"));
    }

    #[test]
    fn test_render_error_passes_through() {
        let err: Error = RenderError::TemplateNotFound("greeting".into()).into();
        assert!(err.to_string().contains("greeting"));
    }

    #[test]
    fn test_message_constructor() {
        let err = Error::message("user not found");
        assert_eq!(err.to_string(), "user not found");
    }
}
