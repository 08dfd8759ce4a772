//! Blueprint handler.

use axum::extract::State;
use axum::Json;

use super::Payload;
use crate::error::ApiError;
use crate::schema::blueprint::{BlueprintResponse, BlueprintSpec};
use crate::state::AppState;

/// Runs every present section; always answers 200 with the report, even
/// when individual steps failed.
///
/// `POST /run-blueprint`
pub async fn run_blueprint(
    State(state): State<AppState>,
    Payload(spec): Payload<BlueprintSpec>,
) -> Result<Json<BlueprintResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let report = service.run_blueprint(spec);
    Ok(Json(report.into()))
}
