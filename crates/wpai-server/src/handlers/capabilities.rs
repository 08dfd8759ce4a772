//! Built-in capability registry handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;
use crate::schema::capabilities::{CapabilityListResponse, CapabilityView};
use crate::state::AppState;

/// Lists registered capabilities. Empty when the built-in registry is
/// disabled.
///
/// `GET /capabilities`
pub async fn list_capabilities(State(state): State<AppState>) -> Json<CapabilityListResponse> {
    let capabilities = state
        .capabilities
        .as_ref()
        .map(|registry| {
            registry
                .entries()
                .into_iter()
                .map(|entry| CapabilityView {
                    name: entry.name,
                    description: entry.description,
                    input_schema: entry.input_schema,
                    output_schema: entry.output_schema,
                })
                .collect()
        })
        .unwrap_or_default();
    Json(CapabilityListResponse { capabilities })
}

/// Invokes a capability with the request body as its arguments.
///
/// A failed operation answers with the error body and the status it maps
/// to.
///
/// `POST /capabilities/{name}`
pub async fn invoke_capability(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let entry = state
        .capabilities
        .as_ref()
        .and_then(|registry| registry.get(&name))
        .ok_or_else(|| ApiError::NotFound(format!("no capability named '{}'", name)))?;

    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("invalid JSON body: {}", e)))?
    };

    let result = entry.handler.call(args).await;
    let status = result
        .get("error")
        .and_then(|e| e.get("status"))
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::OK);
    tracing::debug!(capability = %name, status = status.as_u16(), "capability invoked");
    Ok((status, Json(result)))
}
