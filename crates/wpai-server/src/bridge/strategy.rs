//! Registration strategies, planned once from a registry's surface.

use super::registry::RegistrySurface;

/// One way of registering a capability with a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `register_function(name, callback, input_schema, description, output_schema)`.
    RegisterFunction,
    /// `register(object)` with an object built by a factory type.
    RegisterObject,
    /// `register(name, definition)`.
    RegisterNamedEntry,
    /// `register(name, callback, input_schema)`.
    RegisterCallback,
    /// `register(name, callback, input_schema, description[, output_schema])`.
    RegisterPositional { with_output_schema: bool },
    /// `add(name, definition)`.
    Add,
    /// `registry[name] = definition`.
    IndexAssign,
    /// `registry(definition)`.
    Invoke,
}

impl Strategy {
    /// The `register` strategy matching a declared parameter count.
    fn for_register_arity(arity: usize) -> Option<Strategy> {
        match arity {
            0 => None,
            1 => Some(Strategy::RegisterObject),
            2 => Some(Strategy::RegisterNamedEntry),
            3 => Some(Strategy::RegisterCallback),
            n => Some(Strategy::RegisterPositional {
                with_output_schema: n >= 5,
            }),
        }
    }
}

/// Orders the strategies a registry supports, most specific first.
pub fn plan(surface: &RegistrySurface) -> Vec<Strategy> {
    let mut strategies = Vec::new();
    if surface.register_function {
        strategies.push(Strategy::RegisterFunction);
    }
    if let Some(strategy) = surface.register_arity.and_then(Strategy::for_register_arity) {
        strategies.push(strategy);
    }
    if surface.add {
        strategies.push(Strategy::Add);
    }
    if surface.index_assign {
        strategies.push(Strategy::IndexAssign);
    }
    if surface.callable {
        strategies.push(Strategy::Invoke);
    }
    strategies
}
