//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::extract::State;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Status endpoints
        .route("/", get(status))
        .route("/health", get(status))
        .merge(api::router())
        .with_state(state)
}

/// Status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    active_sessions: usize,
}

/// Liveness probe, plus the active session count for quick inspection.
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "online",
        service: "wallet relay bot",
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.deposit_sessions.len(),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
