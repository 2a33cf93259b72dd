//! HTTP API gateway for Maestro.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/v1/commands` - Submit a command to the coordinator
//! - `GET /api/v1/status` - Active task and knowledge counters
//! - `GET /api/v1/tasks/{id}` - Completion record of a finished task
//!
//! # Architecture
//!
//! ```text
//! Client
//!    │
//!    ▼
//! ┌─────────────────┐
//! │   API Gateway   │ ◄── This crate
//! │     (Axum)      │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐      ┌──────────────────┐
//! │   Coordinator   │─────►│ Completion store │
//! └─────────────────┘      └──────────────────┘
//! ```

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/commands", post(routes::post_command))
        .route("/api/v1/status", get(routes::status))
        .route("/api/v1/tasks/{id}", get(routes::get_task))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until ctrl-c, then shut the coordinator down.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(Arc::clone(&state));

    info!(%addr, "Starting Maestro API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    state.coordinator.shutdown().await;
    Ok(())
}
