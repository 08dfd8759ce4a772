//! Router assembly for the wpai HTTP API.
//!
//! [`build_router`] mounts every handler under `/wpai/v1` behind the access
//! gate, with CORS and tracing middleware layers.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/wpai/v1";

/// Builds the complete axum router with all API routes.
///
/// The auth middleware is a route layer, so it only runs for matched routes
/// and unknown paths still answer 404.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Site settings
        .route("/site-info", get(handlers::site::site_info))
        .route("/basic-setup", post(handlers::site::basic_setup))
        .route("/set-option", post(handlers::site::set_option))
        .route("/rankmath-setup", post(handlers::site::rankmath_setup))
        // Content
        .route("/categories", post(handlers::content::create_categories))
        .route("/pages", post(handlers::content::create_page))
        .route("/menus", post(handlers::content::create_menu))
        .route("/set-homepage", post(handlers::content::set_homepage))
        // Extensions
        .route("/plugins", get(handlers::plugins::list_plugins))
        .route("/install-plugin", post(handlers::plugins::install_plugin))
        // Composite
        .route("/run-blueprint", post(handlers::blueprint::run_blueprint))
        // Built-in capability registry
        .route(
            "/capabilities",
            get(handlers::capabilities::list_capabilities),
        )
        .route(
            "/capabilities/{name}",
            post(handlers::capabilities::invoke_capability),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
