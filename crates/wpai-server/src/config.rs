//! Server configuration read from environment variables.
//!
//! - `WPAI_DB_PATH`: SQLite database file path (default: "wpai.db")
//! - `WPAI_PORT`: listen port (default: "3000")
//! - `WPAI_SITE_URL`: URL reported when no `siteurl` option is stored
//! - `WPAI_PACKAGE_API`: package directory endpoint
//! - `WPAI_CAPABILITY_REGISTRY`: `local` (default) or `none`

use std::str::FromStr;

use crate::packages::DEFAULT_PACKAGE_API;

/// Whether the built-in capability registry runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryMode {
    #[default]
    Local,
    None,
}

impl FromStr for RegistryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "" => Ok(RegistryMode::Local),
            "none" | "off" => Ok(RegistryMode::None),
            other => Err(format!("unknown capability registry mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub site_url: String,
    pub package_api: String,
    pub registry: RegistryMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "wpai.db".to_string(),
            port: 3000,
            site_url: "http://localhost".to_string(),
            package_api: DEFAULT_PACKAGE_API.to_string(),
            registry: RegistryMode::Local,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable values fall back to
    /// the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let port = match lookup("WPAI_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid WPAI_PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };
        let registry = match lookup("WPAI_CAPABILITY_REGISTRY") {
            Some(raw) => raw.parse().unwrap_or_else(|err: String| {
                tracing::warn!(error = %err, "using default capability registry mode");
                defaults.registry
            }),
            None => defaults.registry,
        };

        ServerConfig {
            db_path: lookup("WPAI_DB_PATH").unwrap_or(defaults.db_path),
            port,
            site_url: lookup("WPAI_SITE_URL").unwrap_or(defaults.site_url),
            package_api: lookup("WPAI_PACKAGE_API").unwrap_or(defaults.package_api),
            registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn values_override_defaults() {
        let env: HashMap<&str, &str> = [
            ("WPAI_DB_PATH", "/var/lib/wpai/site.db"),
            ("WPAI_PORT", "8081"),
            ("WPAI_CAPABILITY_REGISTRY", "None"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.db_path, "/var/lib/wpai/site.db");
        assert_eq!(config.port, 8081);
        assert_eq!(config.registry, RegistryMode::None);
        assert_eq!(config.site_url, "http://localhost");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = ServerConfig::from_lookup(|k| match k {
            "WPAI_PORT" => Some("eighty".into()),
            "WPAI_CAPABILITY_REGISTRY" => Some("remote".into()),
            _ => None,
        });
        assert_eq!(config.port, 3000);
        assert_eq!(config.registry, RegistryMode::Local);
    }
}
