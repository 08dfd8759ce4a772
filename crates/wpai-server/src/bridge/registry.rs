//! The shape of an external capability registry, as seen by the adapter.
//!
//! A registry is supplied by a separate runtime component and its exact
//! interface is not known up front. It describes itself once through
//! [`RegistrySurface`]; the adapter then only talks to it through
//! [`ExternalRegistry::call`] with positional [`RegistryArg`]s.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Callback the registry invokes to run a capability.
///
/// `args` may be of any JSON shape; implementations normalize it before
/// reading fields. The returned value is the operation result body.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    async fn call(&self, args: Value) -> Value;
}

/// A capability ready to be handed to a registry.
#[derive(Clone)]
pub struct CapabilityEntry {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
    pub handler: Arc<dyn CapabilityHandler>,
}

impl fmt::Debug for CapabilityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl CapabilityEntry {
    /// JSON descriptor without the callback, as used by filter-style
    /// registries and listings.
    pub fn descriptor(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
            "output_schema": self.output_schema,
        })
    }
}

/// A definition object built by one of the registry's factory types.
#[derive(Debug, Clone)]
pub struct RegistryObject {
    /// Fully-qualified name of the factory type that built it.
    pub class: String,
    pub entry: CapabilityEntry,
}

/// One positional argument of a registry call.
#[derive(Debug, Clone)]
pub enum RegistryArg {
    Name(String),
    Callback(Arc<dyn CapabilityHandler>),
    Schema(Value),
    Description(String),
    /// The full definition mapping.
    Definition(CapabilityEntry),
    Object(RegistryObject),
}

impl fmt::Debug for dyn CapabilityHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CapabilityHandler")
    }
}

/// Registry entry points the adapter can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `register_function(name, callback, input_schema, description, output_schema)`.
    RegisterFunction,
    /// Generic `register(...)` with a declared number of parameters.
    Register,
    /// `add(name, definition)`.
    Add,
    /// `registry[name] = definition`.
    IndexAssign,
    /// `registry(definition)`.
    Invoke,
}

/// What a registry exposes, reflected once at detection time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySurface {
    pub register_function: bool,
    /// Declared positional parameter count of `register`, if present.
    pub register_arity: Option<usize>,
    pub add: bool,
    pub index_assign: bool,
    pub callable: bool,
    /// Registry hands its current collection to a transform hook.
    pub filter: bool,
}

/// Failures raised by a registry. They never escape the adapter.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry does not support {0}")]
    Unsupported(&'static str),

    #[error("registry has no factory type '{0}'")]
    UnknownClass(String),

    #[error("registry rejected '{name}': {reason}")]
    Rejected { name: String, reason: String },

    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
}

/// An optional, externally supplied capability registry.
pub trait ExternalRegistry: Send + Sync {
    /// Entry points this registry exposes.
    fn surface(&self) -> RegistrySurface;

    /// Calls an entry point with positional arguments.
    fn call(&self, entry: EntryPoint, args: Vec<RegistryArg>) -> Result<(), RegistryError>;

    /// Builds a definition object through the factory type `class`.
    fn construct(
        &self,
        class: &str,
        _entry: &CapabilityEntry,
    ) -> Result<RegistryObject, RegistryError> {
        Err(RegistryError::UnknownClass(class.to_string()))
    }

    /// Runs the registry's transform hook over its current collection.
    fn apply_filter(&self, _augment: &dyn Fn(Value) -> Value) -> Result<(), RegistryError> {
        Err(RegistryError::Unsupported("filter hooks"))
    }
}
