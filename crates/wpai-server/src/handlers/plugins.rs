//! Extension inventory and install handlers.

use axum::extract::State;
use axum::Json;

use super::Payload;
use crate::error::ApiError;
use crate::schema::plugins::{InstallPluginRequest, InstallPluginResponse, PluginView};
use crate::state::AppState;

/// `GET /plugins`
pub async fn list_plugins(State(state): State<AppState>) -> Result<Json<Vec<PluginView>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.list_plugins()?))
}

/// Resolves, downloads and activates an extension. The lock is held for
/// the whole download.
///
/// `POST /install-plugin`
pub async fn install_plugin(
    State(state): State<AppState>,
    Payload(req): Payload<InstallPluginRequest>,
) -> Result<Json<InstallPluginResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.install_plugin(req).await?))
}
