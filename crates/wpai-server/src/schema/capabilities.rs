//! Capability listing types for the built-in registry.

use serde::Serialize;
use serde_json::Value;

/// Public description of a registered capability.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityView {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

/// Response for `GET /capabilities`.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityListResponse {
    pub capabilities: Vec<CapabilityView>,
}
