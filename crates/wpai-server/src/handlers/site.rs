//! Site settings handlers.

use axum::extract::State;
use axum::Json;

use super::Payload;
use crate::error::ApiError;
use crate::schema::common::MessageResponse;
use crate::schema::options::SetOptionRequest;
use crate::schema::site::{BasicSetupRequest, SiteInfoResponse};
use crate::state::AppState;

/// `GET /site-info`
pub async fn site_info(State(state): State<AppState>) -> Result<Json<SiteInfoResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(service.site_info()?))
}

/// `POST /basic-setup`
pub async fn basic_setup(
    State(state): State<AppState>,
    Payload(req): Payload<BasicSetupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.basic_setup(req)?))
}

/// `POST /set-option`
pub async fn set_option(
    State(state): State<AppState>,
    Payload(req): Payload<SetOptionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_option(req)?))
}

/// Applies SEO defaults. An inactive SEO extension answers 200 with
/// `success: false`.
///
/// `POST /rankmath-setup`
pub async fn rankmath_setup(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.setup_seo()?))
}
