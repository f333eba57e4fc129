//! Exposure definitions and the per-instance bound registry.
//!
//! An exposure declares how one local value is computed from the render
//! input. Definitions live on a [`ViewDefinition`](crate::ViewDefinition)
//! in registration order; building a view instance *binds* the registry,
//! snapshotting the definition list so later changes to the definition
//! cannot affect instances that already exist.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::Value;

use crate::error::Error;
use crate::input::Input;
use crate::locals::{LocalEntry, Locals};

/// An exposure computation: raw input plus the locals resolved so far.
///
/// Receiving the already-resolved locals lets a later exposure build on an
/// earlier one:
///
/// ```rust,ignore
/// .expose("user", |input, _| { ... })
/// .expose("greeting", |_, locals| {
///     let user = locals.get("user").cloned().unwrap_or_default();
///     Ok(Value::from(format!("hello {user}")))
/// })
/// ```
pub type ExposureFn = Arc<dyn Fn(&Input, &Locals) -> Result<Value, Error> + Send + Sync>;

/// How an exposure's value is obtained.
#[derive(Clone)]
pub enum Computation {
    /// Read the input key matching the exposure's name; absent keys
    /// resolve to the undefined value.
    Default,
    /// Run an arbitrary function of the input and prior locals.
    Fn(ExposureFn),
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Computation::Default => f.write_str("Default"),
            Computation::Fn(_) => f.write_str("Fn"),
        }
    }
}

/// Options attached to an exposure declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposureOptions {
    /// Decoration policy: `Some(false)` skips decoration even for present
    /// values, `Some(true)` and `None` decorate present values.
    pub decorate: Option<bool>,
    /// Whether the local is passed to a layout's scope.
    pub layout: bool,
    /// Marks internal bookkeeping values; they still render, but locals
    /// consumers can filter them out.
    pub private: bool,
    /// Free-form options forwarded to the part builder on decoration.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One named exposure definition.
#[derive(Debug, Clone)]
pub struct Exposure {
    name: String,
    computation: Computation,
    options: ExposureOptions,
}

impl Exposure {
    /// An exposure computed by a function.
    pub fn computed<F>(name: impl Into<String>, options: ExposureOptions, f: F) -> Self
    where
        F: Fn(&Input, &Locals) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            computation: Computation::Fn(Arc::new(f)),
            options,
        }
    }

    /// An exposure that reads the identically-named input key.
    pub fn from_input(name: impl Into<String>, options: ExposureOptions) -> Self {
        Self {
            name: name.into(),
            computation: Computation::Default,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ExposureOptions {
        &self.options
    }

    /// The decoration flag as declared; `None` means the default policy.
    pub fn decorate(&self) -> Option<bool> {
        self.options.decorate
    }

    pub fn for_layout(&self) -> bool {
        self.options.layout
    }

    pub fn is_private(&self) -> bool {
        self.options.private
    }

    /// Computes the exposure's raw value.
    pub(crate) fn compute(&self, input: &Input, resolved: &Locals) -> Result<Value, Error> {
        match &self.computation {
            Computation::Default => Ok(input
                .get(&self.name)
                .cloned()
                .unwrap_or(Value::UNDEFINED)),
            Computation::Fn(f) => f(input, resolved),
        }
    }
}

/// Named, ordered exposure registry owned by a view definition.
#[derive(Debug, Clone, Default)]
pub struct Exposures {
    items: Vec<Arc<Exposure>>,
}

impl Exposures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exposure.
    ///
    /// Names are unique within one registry: re-adding an existing name
    /// replaces the definition in place, keeping its position.
    pub fn add(&mut self, exposure: Exposure) {
        self.import(Arc::new(exposure));
    }

    /// Copies a definition in, with the same replace-by-name semantics as
    /// [`add`](Self::add). Used when deriving one definition from another.
    pub fn import(&mut self, exposure: Arc<Exposure>) {
        match self.items.iter_mut().find(|e| e.name() == exposure.name()) {
            Some(slot) => *slot = exposure,
            None => self.items.push(exposure),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Exposure> {
        self.items
            .iter()
            .find(|e| e.name() == name)
            .map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|e| e.name())
    }

    /// Iterates definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Exposure> {
        self.items.iter().map(Arc::as_ref)
    }

    /// Snapshots the registry for one view instance.
    ///
    /// The snapshot shares the definitions (`Arc` clones); replacing a
    /// definition in this registry afterwards does not change what bound
    /// instances see.
    pub fn bind(&self) -> BoundExposures {
        BoundExposures {
            items: self.items.clone(),
        }
    }
}

/// The instance-level callable collection of exposures.
#[derive(Debug, Clone)]
pub struct BoundExposures {
    items: Vec<Arc<Exposure>>,
}

impl BoundExposures {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolves every exposure against `input`, in registration order.
    ///
    /// The `decide` callback receives each computed value together with its
    /// definition and returns the final local value - this is where the
    /// caller applies decoration. Each entry lands in the returned locals
    /// before the next exposure is computed, so computations can read their
    /// predecessors.
    pub fn resolve(
        &self,
        input: &Input,
        mut decide: impl FnMut(Value, &Exposure) -> Result<Value, Error>,
    ) -> Result<Locals, Error> {
        let mut locals = Locals::new();
        for exposure in &self.items {
            let value = exposure.compute(input, &locals)?;
            let value = decide(value, exposure)?;
            locals.push(LocalEntry::new(
                exposure.name(),
                value,
                exposure.is_private(),
                exposure.for_layout(),
            ));
        }
        Ok(locals)
    }
}
