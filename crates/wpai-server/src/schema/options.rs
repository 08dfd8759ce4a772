//! Generic option request types.

use serde::Deserialize;

/// Request for `POST /set-option`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetOptionRequest {
    pub option_name: Option<String>,
    /// Any JSON value; absent means `null`.
    #[serde(default)]
    pub option_value: serde_json::Value,
}
