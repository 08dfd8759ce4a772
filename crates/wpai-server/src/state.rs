//! Application state shared by all handlers.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>`. Every
//! request holds the lock for its whole operation, so the sub-operations of
//! one blueprint never interleave with another request inside this process.
//! `SiteService` owns a `rusqlite::Connection`, which is `!Sync`, so an
//! `RwLock` is not an option.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use wpai_storage::{SiteStore, SqliteStore};

use crate::auth::Credential;
use crate::bridge::{self, LocalRegistry, ProcessHost, REMEMBERED_FLAG};
use crate::config::{RegistryMode, ServerConfig};
use crate::error::ApiError;
use crate::packages::{DirectoryClient, PackageSource};
use crate::service::SiteService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<SiteService>>,
    /// `None` when the credential could not be initialized; every request
    /// is then rejected.
    pub credential: Option<Credential>,
    /// Built-in capability registry, when enabled.
    pub capabilities: Option<Arc<LocalRegistry>>,
}

impl AppState {
    /// Opens the configured SQLite database and wires the package directory.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store = SqliteStore::new(&config.db_path)?;
        let packages = Arc::new(DirectoryClient::new(config.package_api.clone()));
        let service =
            SiteService::new(Box::new(store), packages).with_site_url(config.site_url.clone());
        Ok(Self::from_service(service, config.registry))
    }

    /// In-memory SQLite state with the default package directory (for
    /// testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()?;
        Ok(Self::with_parts(
            Box::new(store),
            Arc::new(DirectoryClient::default()),
            RegistryMode::Local,
        ))
    }

    /// State over an arbitrary store and package source.
    pub fn with_parts(
        store: Box<dyn SiteStore>,
        packages: Arc<dyn PackageSource>,
        registry: RegistryMode,
    ) -> Self {
        Self::from_service(SiteService::new(store, packages), registry)
    }

    /// Initializes the credential, then runs capability registration.
    pub fn from_service(mut service: SiteService, registry: RegistryMode) -> Self {
        let credential = match Credential::load_or_init(service.store_mut()) {
            Ok(credential) => Some(credential),
            Err(err) => {
                tracing::error!(error = %err, "credential unavailable, all requests will be rejected");
                None
            }
        };
        let remembered = match service.store().get_option(REMEMBERED_FLAG) {
            Ok(value) => value.and_then(|v| v.as_bool()).unwrap_or(false),
            Err(err) => {
                tracing::warn!(error = %err, "could not read registration flag");
                false
            }
        };

        let service = Arc::new(Mutex::new(service));
        let mut host = ProcessHost::new().with_remembered(remembered);
        let capabilities = match registry {
            RegistryMode::Local => {
                let local = Arc::new(LocalRegistry::new());
                host = host.with_local_registry(local.clone());
                Some(local)
            }
            RegistryMode::None => None,
        };

        let entries = bridge::bind_all(&service);
        if let Some(report) = bridge::integrate(&host, &entries) {
            if report.any() && !remembered {
                remember_registration(&service);
            }
        }

        AppState {
            service,
            credential,
            capabilities,
        }
    }
}

/// Persists the flag that short-circuits detection on the next start.
fn remember_registration(service: &Mutex<SiteService>) {
    let Ok(mut svc) = service.try_lock() else {
        tracing::warn!("service busy, registration flag not written");
        return;
    };
    if let Err(err) = svc
        .store_mut()
        .set_option(REMEMBERED_FLAG, Value::Bool(true))
    {
        tracing::warn!(error = %err, "could not persist registration flag");
    }
}
