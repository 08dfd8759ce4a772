//! Site-level settings request/response types.

use serde::{Deserialize, Serialize};

use super::plugins::PluginView;

/// Request for `POST /basic-setup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicSetupRequest {
    /// Permalink structure; defaults to `/%postname%/`.
    pub permalink: Option<String>,
    /// Timezone identifier; defaults to `UTC`.
    pub timezone: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Response for `GET /site-info`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteInfoResponse {
    pub name: String,
    pub description: String,
    pub url: String,
    pub timezone: String,
    pub permalink_structure: String,
    pub show_on_front: String,
    pub page_on_front: Option<i64>,
    pub version: String,
    pub plugins: Vec<PluginView>,
}
