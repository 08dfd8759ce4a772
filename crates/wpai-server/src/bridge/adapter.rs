//! Registers capabilities with an external registry.
//!
//! For every capability the planned strategies are tried in order until one
//! succeeds. A failing strategy is logged and the next one is tried; a
//! capability no strategy accepts is simply left unregistered.

use super::detect::FACTORY_TYPES;
use super::filter::augment_collection;
use super::registry::{
    CapabilityEntry, EntryPoint, ExternalRegistry, RegistryArg, RegistryError,
};
use super::strategy::{plan, Strategy};

/// What a registration pass achieved.
#[derive(Debug, Clone, Default)]
pub struct RegistrationReport {
    /// Registered capabilities and the strategy that worked for each.
    pub registered: Vec<(String, Strategy)>,
    /// Capabilities every strategy failed for.
    pub unregistered: Vec<String>,
    /// Whether the registry's filter hook accepted the augmented collection.
    pub filtered: bool,
}

impl RegistrationReport {
    pub fn strategy_for(&self, name: &str) -> Option<Strategy> {
        self.registered
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, strategy)| *strategy)
    }

    /// True when at least one capability reached the registry.
    pub fn any(&self) -> bool {
        !self.registered.is_empty() || self.filtered
    }
}

/// Registers every capability with `registry`.
pub fn register_all(
    registry: &dyn ExternalRegistry,
    entries: &[CapabilityEntry],
) -> RegistrationReport {
    let surface = registry.surface();
    let strategies = plan(&surface);
    let mut report = RegistrationReport::default();

    if surface.filter {
        match registry.apply_filter(&|current| augment_collection(current, entries)) {
            Ok(()) => report.filtered = true,
            Err(err) => tracing::debug!(error = %err, "registry filter hook failed"),
        }
    }

    for entry in entries {
        match register_one(registry, &strategies, entry) {
            Some(strategy) => report.registered.push((entry.name.clone(), strategy)),
            None => report.unregistered.push(entry.name.clone()),
        }
    }

    tracing::info!(
        registered = report.registered.len(),
        unregistered = report.unregistered.len(),
        filtered = report.filtered,
        "capability registration finished"
    );
    report
}

/// Tries each strategy in turn, returning the first that succeeded.
fn register_one(
    registry: &dyn ExternalRegistry,
    strategies: &[Strategy],
    entry: &CapabilityEntry,
) -> Option<Strategy> {
    for strategy in strategies {
        match attempt(registry, *strategy, entry) {
            Ok(()) => {
                tracing::debug!(capability = %entry.name, ?strategy, "capability registered");
                return Some(*strategy);
            }
            Err(err) => {
                tracing::debug!(capability = %entry.name, ?strategy, error = %err, "registration strategy failed");
            }
        }
    }
    None
}

fn attempt(
    registry: &dyn ExternalRegistry,
    strategy: Strategy,
    entry: &CapabilityEntry,
) -> Result<(), RegistryError> {
    let name = || RegistryArg::Name(entry.name.clone());
    let callback = || RegistryArg::Callback(entry.handler.clone());
    let input_schema = || RegistryArg::Schema(entry.input_schema.clone());
    let description = || RegistryArg::Description(entry.description.clone());
    let definition = || RegistryArg::Definition(entry.clone());

    match strategy {
        Strategy::RegisterFunction => registry.call(
            EntryPoint::RegisterFunction,
            vec![
                name(),
                callback(),
                input_schema(),
                description(),
                RegistryArg::Schema(entry.output_schema.clone()),
            ],
        ),
        Strategy::RegisterObject => {
            let object = construct_definition(registry, entry)?;
            registry.call(EntryPoint::Register, vec![RegistryArg::Object(object)])
        }
        Strategy::RegisterNamedEntry => {
            registry.call(EntryPoint::Register, vec![name(), definition()])
        }
        Strategy::RegisterCallback => {
            registry.call(EntryPoint::Register, vec![name(), callback(), input_schema()])
        }
        Strategy::RegisterPositional { with_output_schema } => {
            let mut args = vec![name(), callback(), input_schema(), description()];
            if with_output_schema {
                args.push(RegistryArg::Schema(entry.output_schema.clone()));
            }
            registry.call(EntryPoint::Register, args)
        }
        Strategy::Add => registry.call(EntryPoint::Add, vec![name(), definition()]),
        Strategy::IndexAssign => registry.call(EntryPoint::IndexAssign, vec![name(), definition()]),
        Strategy::Invoke => registry.call(EntryPoint::Invoke, vec![definition()]),
    }
}

/// Builds a definition object with the first factory type the registry
/// knows.
fn construct_definition(
    registry: &dyn ExternalRegistry,
    entry: &CapabilityEntry,
) -> Result<super::registry::RegistryObject, RegistryError> {
    let mut last_error = RegistryError::Unsupported("definition objects");
    for class in FACTORY_TYPES {
        match registry.construct(class, entry) {
            Ok(object) => return Ok(object),
            Err(err) => last_error = err,
        }
    }
    Err(last_error)
}
