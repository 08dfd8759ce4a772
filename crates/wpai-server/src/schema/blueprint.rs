//! Blueprint request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A composite site setup. Every section is optional; an absent (or `null`)
/// section is skipped, never cleared.
///
/// Sections stay as raw JSON and are decoded element by element when the
/// blueprint runs, so a malformed entry only fails its own step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlueprintSpec {
    #[serde(default, alias = "basic_setup")]
    pub basic: Option<Value>,
    /// Either a list of `{name, slug?}` records or `{categories: [...]}`.
    #[serde(default)]
    pub categories: Option<Value>,
    #[serde(default)]
    pub pages: Option<Value>,
    #[serde(default)]
    pub menus: Option<Value>,
    /// `{page_id}`, `{slug}`, a bare page ID or a bare slug.
    #[serde(default)]
    pub homepage: Option<Value>,
    /// Extension identifiers to configure: strings or `{name}` records.
    #[serde(default, alias = "plugin_configs")]
    pub plugins: Option<Value>,
}

/// Response for `POST /run-blueprint`.
#[derive(Debug, Clone, Serialize)]
pub struct BlueprintResponse {
    pub success: bool,
    pub report: Vec<String>,
}
