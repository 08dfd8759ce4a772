//! Content handlers: categories, pages, menus and the front page.

use axum::extract::State;
use axum::Json;

use super::Payload;
use crate::error::ApiError;
use crate::schema::content::{
    CategoriesRequest, CategoriesResponse, HomepageRequest, HomepageResponse, MenuRequest,
    MenuResponse, PageRequest, PageResponse,
};
use crate::state::AppState;

/// `POST /categories`
pub async fn create_categories(
    State(state): State<AppState>,
    Payload(req): Payload<CategoriesRequest>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.create_categories(req)?))
}

/// Creates or updates a page by slug.
///
/// `POST /pages`
pub async fn create_page(
    State(state): State<AppState>,
    Payload(req): Payload<PageRequest>,
) -> Result<Json<PageResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.create_page(req)?))
}

/// `POST /menus`
pub async fn create_menu(
    State(state): State<AppState>,
    Payload(req): Payload<MenuRequest>,
) -> Result<Json<MenuResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.create_menu(req)?))
}

/// `POST /set-homepage`
pub async fn set_homepage(
    State(state): State<AppState>,
    Payload(req): Payload<HomepageRequest>,
) -> Result<Json<HomepageResponse>, ApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.set_homepage(req)?))
}
