//! HTTP route handlers for the API.

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use maestro_common::CompletionRecord;
use maestro_coordinator::store::is_valid_task_id;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub response: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    fn bad_request(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "BAD_REQUEST",
            status: StatusCode::BAD_REQUEST,
        }
    }

    fn not_found(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "NOT_FOUND",
            status: StatusCode::NOT_FOUND,
        }
    }

    fn internal(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "INTERNAL_ERROR",
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Submit a command. Fast-path commands answer directly; everything else
/// is acknowledged with its task id.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ErrorResponse> {
    if request.command.trim().is_empty() {
        return Err(ErrorResponse::bad_request("command must not be empty"));
    }

    info!(
        command_preview = %request.command.chars().take(50).collect::<String>(),
        "Received command"
    );

    let response = state.coordinator.process_command(&request.command).await;
    Ok(Json(CommandResponse { response }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub active_tasks: usize,
    pub knowledge_entries: usize,
    pub queued: usize,
    pub summary: String,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.coordinator.status_snapshot();
    Json(StatusResponse {
        active_tasks: snapshot.active_tasks,
        knowledge_entries: snapshot.knowledge_entries,
        queued: snapshot.queued,
        summary: state.coordinator.status(),
    })
}

/// Fetch the completion record of a finished task.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<CompletionRecord>, ErrorResponse> {
    debug!(task_id = %task_id, "Getting task completion");

    if !is_valid_task_id(&task_id) {
        return Err(ErrorResponse::not_found(format!("Task not found: {}", task_id)));
    }

    match state.coordinator.completion(&task_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) if state.coordinator.is_active(&task_id) => Err(ErrorResponse::not_found(
            format!("Task {} is still running", task_id),
        )),
        Ok(None) => Err(ErrorResponse::not_found(format!("Task not found: {}", task_id))),
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Failed to load completion record");
            Err(ErrorResponse::internal(format!("Failed to load task: {}", e)))
        }
    }
}
