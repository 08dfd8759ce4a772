//! Extension inventory and install types.

use serde::{Deserialize, Serialize};

use wpai_storage::Extension;

/// One entry of the extension inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginView {
    pub path: String,
    pub name: String,
    pub version: String,
    pub active: bool,
}

impl From<Extension> for PluginView {
    fn from(ext: Extension) -> Self {
        PluginView {
            path: ext.slug,
            name: ext.name,
            version: ext.version,
            active: ext.active,
        }
    }
}

/// Request for `POST /install-plugin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstallPluginRequest {
    pub slug: Option<String>,
}

/// Response for `POST /install-plugin`.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPluginResponse {
    pub success: bool,
    pub message: String,
    pub plugin: PluginView,
}
