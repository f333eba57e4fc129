//! The result of a render call.

use std::fmt;

use minijinja::value::Value;

use crate::locals::Locals;

/// Immutable result of [`View::render`](crate::View::render): the final
/// output string plus the full locals map that produced it.
///
/// The locals always contain every exposure's value, including private ones
/// and ones a layout never saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    output: String,
    locals: Locals,
}

impl Rendered {
    pub(crate) fn new(output: String, locals: Locals) -> Self {
        Self { output, locals }
    }

    /// The final output string.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the result, returning the output string.
    pub fn into_output(self) -> String {
        self.output
    }

    /// The full locals map of the call.
    pub fn locals(&self) -> &Locals {
        &self.locals
    }

    /// Shorthand for looking up one local's value.
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
