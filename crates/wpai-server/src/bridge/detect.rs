//! Detection of an optional capability registry in the host process.

use std::sync::Arc;

use super::registry::ExternalRegistry;

/// Settings key set after a successful registration pass.
pub const REMEMBERED_FLAG: &str = "wpai_registry_registered";

/// Environment markers published by registry components.
pub const VERSION_MARKERS: &[&str] = &["CAPABILITY_REGISTRY_VERSION", "MCP_ADAPTER_VERSION"];

/// Type names a registry component is known to provide.
pub const REGISTRY_TYPES: &[&str] = &[
    "wpai::CapabilityRegistry",
    "capabilities::Registry",
    "mcp_adapter::Adapter",
    "mcp_adapter::AbilityRegistry",
];

/// Events a registry listens on when it expects registrations.
pub const REGISTRATION_EVENTS: &[&str] = &["capabilities.register", "mcp_adapter.init"];

/// Factory types that build a definition object for one-argument
/// `register` entry points, tried in order.
pub const FACTORY_TYPES: &[&str] = &[
    "capabilities::Definition",
    "mcp_adapter::Ability",
    "mcp_adapter::Tool",
];

/// What the adapter can learn about its host process.
pub trait HostEnvironment {
    /// A previous run registered successfully.
    fn remembered(&self) -> bool;

    /// Value of a version marker, if published.
    fn version_marker(&self, marker: &str) -> Option<String>;

    fn type_exists(&self, type_name: &str) -> bool;

    fn has_listeners(&self, event: &str) -> bool;

    /// The registry handle, if the host can hand one out.
    fn registry(&self) -> Option<Arc<dyn ExternalRegistry>>;
}

/// Which check found the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSource {
    Remembered,
    VersionMarker { marker: &'static str, version: String },
    KnownType(&'static str),
    Listener(&'static str),
}

/// Runs the detection checks in order and reports the first hit.
pub fn detect(host: &dyn HostEnvironment) -> Option<DetectionSource> {
    if host.remembered() {
        return Some(DetectionSource::Remembered);
    }
    for marker in VERSION_MARKERS {
        if let Some(version) = host.version_marker(marker) {
            return Some(DetectionSource::VersionMarker {
                marker: *marker,
                version,
            });
        }
    }
    if let Some(type_name) = REGISTRY_TYPES.iter().find(|t| host.type_exists(t)) {
        return Some(DetectionSource::KnownType(*type_name));
    }
    REGISTRATION_EVENTS
        .iter()
        .find(|e| host.has_listeners(e))
        .map(|event| DetectionSource::Listener(*event))
}
