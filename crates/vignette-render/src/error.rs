//! Error types for template rendering.
//!
//! [`RenderError`] abstracts over the underlying template engine's errors,
//! providing a stable public API that doesn't leak engine internals.

/// Error type for renderer construction and template rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template not found in the compiled tree.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Template syntax error or evaluation failure.
    #[error("template error: {0}")]
    Template(String),

    /// Data serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unrecognized renderer option key or malformed option value.
    #[error("invalid renderer option: {0}")]
    InvalidOption(String),

    /// I/O error reading a template from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other operational error.
    #[error("{0}")]
    Operation(String),
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => RenderError::Template(err.to_string()),
            ErrorKind::BadSerialization => RenderError::Serialization(err.to_string()),
            _ => RenderError::Operation(err.to_string()),
        }
    }
}
