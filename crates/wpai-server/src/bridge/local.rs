//! Built-in capability registry and the process host that exposes it.
//!
//! [`LocalRegistry`] is one concrete registry shape: a two-argument
//! `register(name, definition)` plus index assignment. The server enables it
//! by configuration so capabilities can be listed and invoked over HTTP.

use std::sync::Arc;

use dashmap::DashMap;

use super::detect::HostEnvironment;
use super::registry::{
    CapabilityEntry, EntryPoint, ExternalRegistry, RegistryArg, RegistryError, RegistrySurface,
};

/// Capability registry held in process memory.
#[derive(Debug, Default)]
pub struct LocalRegistry {
    entries: DashMap<String, CapabilityEntry>,
}

impl LocalRegistry {
    /// Type name the registry is detected by.
    pub const TYPE_NAME: &'static str = "wpai::CapabilityRegistry";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<CapabilityEntry> {
        self.entries.get(name).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered capabilities, sorted by name.
    pub fn entries(&self) -> Vec<CapabilityEntry> {
        let mut entries: Vec<_> = self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    fn store(&self, args: Vec<RegistryArg>) -> Result<(), RegistryError> {
        let got = args.len();
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next()) {
            (Some(RegistryArg::Name(name)), Some(RegistryArg::Definition(entry)), None) => {
                if name != entry.name {
                    return Err(RegistryError::Rejected {
                        name,
                        reason: format!("definition is named '{}'", entry.name),
                    });
                }
                self.entries.insert(name, entry);
                Ok(())
            }
            (Some(RegistryArg::Name(name)), Some(_), None) => Err(RegistryError::Rejected {
                name,
                reason: "expected a definition mapping".to_string(),
            }),
            _ => Err(RegistryError::Arity { expected: 2, got }),
        }
    }
}

impl ExternalRegistry for LocalRegistry {
    fn surface(&self) -> RegistrySurface {
        RegistrySurface {
            register_arity: Some(2),
            index_assign: true,
            ..Default::default()
        }
    }

    fn call(&self, entry: EntryPoint, args: Vec<RegistryArg>) -> Result<(), RegistryError> {
        match entry {
            EntryPoint::Register | EntryPoint::IndexAssign => self.store(args),
            EntryPoint::RegisterFunction => Err(RegistryError::Unsupported("register_function")),
            EntryPoint::Add => Err(RegistryError::Unsupported("add")),
            EntryPoint::Invoke => Err(RegistryError::Unsupported("invocation")),
        }
    }
}

/// The running server process, as seen by registry detection.
#[derive(Debug, Default)]
pub struct ProcessHost {
    remembered: bool,
    types: Vec<&'static str>,
    listeners: Vec<&'static str>,
    registry: Option<Arc<LocalRegistry>>,
}

impl ProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks that an earlier run completed a registration pass.
    pub fn with_remembered(mut self, remembered: bool) -> Self {
        self.remembered = remembered;
        self
    }

    /// Installs the built-in registry and publishes its type name.
    pub fn with_local_registry(mut self, registry: Arc<LocalRegistry>) -> Self {
        self.types.push(LocalRegistry::TYPE_NAME);
        self.registry = Some(registry);
        self
    }

    /// Records a hook listening for a registration event.
    pub fn with_listener(mut self, event: &'static str) -> Self {
        self.listeners.push(event);
        self
    }
}

impl HostEnvironment for ProcessHost {
    fn remembered(&self) -> bool {
        self.remembered
    }

    fn version_marker(&self, marker: &str) -> Option<String> {
        std::env::var(marker).ok().filter(|v| !v.is_empty())
    }

    fn type_exists(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| *t == type_name)
    }

    fn has_listeners(&self, event: &str) -> bool {
        self.listeners.iter().any(|l| *l == event)
    }

    fn registry(&self) -> Option<Arc<dyn ExternalRegistry>> {
        self.registry
            .clone()
            .map(|r| r as Arc<dyn ExternalRegistry>)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    struct Echo;

    #[async_trait]
    impl crate::bridge::registry::CapabilityHandler for Echo {
        async fn call(&self, args: Value) -> Value {
            args
        }
    }

    fn entry(name: &str) -> CapabilityEntry {
        CapabilityEntry {
            name: name.to_string(),
            description: String::new(),
            input_schema: json!({ "type": "object" }),
            output_schema: json!({}),
            handler: Arc::new(Echo),
        }
    }

    #[test]
    fn register_takes_name_and_definition() {
        let registry = LocalRegistry::new();
        registry
            .call(
                EntryPoint::Register,
                vec![
                    RegistryArg::Name("b".into()),
                    RegistryArg::Definition(entry("b")),
                ],
            )
            .unwrap();
        registry
            .call(
                EntryPoint::IndexAssign,
                vec![
                    RegistryArg::Name("a".into()),
                    RegistryArg::Definition(entry("a")),
                ],
            )
            .unwrap();

        let names: Vec<_> = registry.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn other_shapes_are_refused() {
        let registry = LocalRegistry::new();
        let err = registry
            .call(
                EntryPoint::Register,
                vec![
                    RegistryArg::Name("a".into()),
                    RegistryArg::Callback(Arc::new(Echo)),
                    RegistryArg::Schema(json!({})),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::Arity { expected: 2, got: 3 }));

        let err = registry
            .call(EntryPoint::Add, vec![RegistryArg::Name("a".into())])
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unsupported(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn host_publishes_local_registry_type() {
        let host = ProcessHost::new().with_local_registry(Arc::new(LocalRegistry::new()));
        assert!(host.type_exists(LocalRegistry::TYPE_NAME));
        assert!(host.registry().is_some());
        assert!(ProcessHost::new().registry().is_none());
    }

    #[test]
    fn listener_alone_is_detected() {
        use crate::bridge::detect::{detect, DetectionSource, VERSION_MARKERS};

        // A marker exported in the environment would win over listeners.
        if VERSION_MARKERS.iter().any(|m| std::env::var(m).is_ok()) {
            return;
        }
        assert_eq!(detect(&ProcessHost::new()), None);

        let host = ProcessHost::new().with_listener("mcp_adapter.init");
        assert!(host.has_listeners("mcp_adapter.init"));
        assert!(!host.has_listeners("capabilities.register"));
        assert_eq!(
            detect(&host),
            Some(DetectionSource::Listener("mcp_adapter.init"))
        );
    }
}
