//! Capability registration adapter.
//!
//! Exposes every site operation as a named capability to an optional
//! registry supplied by the host. Detection runs once at startup; when a
//! registry is present its surface is reflected into an ordered strategy
//! list and each capability is registered with the first strategy that
//! works. Nothing here is required for the HTTP API to function.

pub mod adapter;
pub mod callback;
pub mod definitions;
pub mod detect;
pub mod filter;
pub mod local;
pub mod normalize;
pub mod registry;
pub mod strategy;

pub use adapter::{register_all, RegistrationReport};
pub use definitions::{bind_all, definitions, CapabilityDefinition, Operation};
pub use detect::{detect, DetectionSource, HostEnvironment, REMEMBERED_FLAG};
pub use filter::augment_collection;
pub use local::{LocalRegistry, ProcessHost};
pub use normalize::normalize_args;
pub use registry::{
    CapabilityEntry, CapabilityHandler, EntryPoint, ExternalRegistry, RegistryArg,
    RegistryError, RegistryObject, RegistrySurface,
};
pub use strategy::{plan, Strategy};

/// Detects a registry and registers `entries` with it.
///
/// Returns `None` when no registry was detected or the host could not hand
/// one out.
pub fn integrate(
    host: &dyn HostEnvironment,
    entries: &[CapabilityEntry],
) -> Option<RegistrationReport> {
    let Some(source) = detect(host) else {
        tracing::debug!("no capability registry detected");
        return None;
    };
    let Some(registry) = host.registry() else {
        tracing::info!(?source, "capability registry detected but not reachable");
        return None;
    };
    tracing::info!(?source, capabilities = entries.len(), "registering capabilities");
    Some(register_all(registry.as_ref(), entries))
}
