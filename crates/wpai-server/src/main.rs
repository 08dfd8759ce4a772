//! Binary entrypoint for the wpai HTTP server.
//!
//! Configuration comes from environment variables, see
//! [`ServerConfig`](wpai_server::config::ServerConfig).

use std::process::ExitCode;

use wpai_server::config::ServerConfig;
use wpai_server::router::build_router;
use wpai_server::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, db = %config.db_path, "failed to initialize application state");
            return ExitCode::FAILURE;
        }
    };
    if state.credential.is_some() {
        tracing::info!(option = wpai_server::auth::TOKEN_OPTION, "API token ready");
    }

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("wpai server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
