//! Integration tests for the API layer.
//!
//! These tests spin up a real HTTP server on a random port.

use maestro_agents::ScriptedCommandRunner;
use maestro_api::{create_router, AppState};
use maestro_coordinator::{Coordinator, CoordinatorConfig, MemoryCompletionStore, SilentSpeaker};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Spin up a test server on a random port and return the base URL and state.
async fn start_test_server() -> (String, Arc<AppState>) {
    let mut config = CoordinatorConfig::default();
    config.speech.enabled = false;

    let coordinator = Coordinator::builder(config)
        .store(Arc::new(MemoryCompletionStore::new()))
        .command_runner(Arc::new(ScriptedCommandRunner::success("")))
        .speaker(Arc::new(SilentSpeaker))
        .build()
        .unwrap();
    let state = Arc::new(AppState::with_coordinator(coordinator));
    let router = create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

/// Helper to GET a URL and return (status, body_string).
async fn get(base: &str, path: &str) -> (u16, String) {
    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

/// Helper to POST JSON and return (status, body_string).
async fn post_json(base: &str, path: &str, json: &str) -> (u16, String) {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}{}", base, path))
        .header("content-type", "application/json")
        .body(json.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

fn task_id_from_ack(ack: &str) -> String {
    let start = ack.find("Task ID: ").unwrap() + "Task ID: ".len();
    ack[start..ack.len() - 1].to_string()
}

// ============================================================================
// Health endpoint
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (base, _state) = start_test_server().await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert!(json["uptime_seconds"].is_u64());
}

// ============================================================================
// Commands endpoint
// ============================================================================

#[tokio::test]
async fn test_fast_path_command() {
    let (base, _state) = start_test_server().await;
    let (status, body) = post_json(&base, "/api/v1/commands", r#"{"command": "open Safari"}"#).await;
    assert_eq!(status, 200);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["response"], "Opening Safari");
}

#[tokio::test]
async fn test_status_command_through_api() {
    let (base, _state) = start_test_server().await;
    let (status, body) = post_json(&base, "/api/v1/commands", r#"{"command": "status"}"#).await;
    assert_eq!(status, 200);
    assert!(body.contains("System Status: 0 active tasks, 0 knowledge entries"));
}

#[tokio::test]
async fn test_empty_command_rejected() {
    let (base, _state) = start_test_server().await;
    let (status, body) = post_json(&base, "/api/v1/commands", r#"{"command": "   "}"#).await;
    assert_eq!(status, 400);
    assert!(body.contains("BAD_REQUEST"));
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (base, _state) = start_test_server().await;
    let (status, _) = post_json(&base, "/api/v1/commands", r#"{"text": "hi"}"#).await;
    assert!((400..500).contains(&status), "got {status}");
}

// ============================================================================
// Status endpoint
// ============================================================================

#[tokio::test]
async fn test_status_endpoint() {
    let (base, _state) = start_test_server().await;
    let (status, body) = get(&base, "/api/v1/status").await;
    assert_eq!(status, 200);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["active_tasks"], 0);
    assert_eq!(json["knowledge_entries"], 0);
    assert_eq!(json["queued"], 0);
    assert_eq!(
        json["summary"],
        "System Status: 0 active tasks, 0 knowledge entries"
    );
}

// ============================================================================
// Tasks endpoint
// ============================================================================

#[tokio::test]
async fn test_orchestrated_command_then_fetch_task() {
    let (base, state) = start_test_server().await;
    let mut completions = state.coordinator.subscribe();

    let (status, body) = post_json(
        &base,
        "/api/v1/commands",
        r#"{"command": "implement a Unity VR hand tracking system with optimal performance"}"#,
    )
    .await;
    assert_eq!(status, 200);

    let json: Value = serde_json::from_str(&body).unwrap();
    let ack = json["response"].as_str().unwrap();
    assert!(ack.starts_with("Processing '"));
    let task_id = task_id_from_ack(ack);

    let record = tokio::time::timeout(Duration::from_secs(10), completions.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.task.id, task_id);

    let (status, body) = get(&base, &format!("/api/v1/tasks/{}", task_id)).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["task"]["id"], task_id.as_str());
    assert_eq!(json["task"]["type"], "development");
    assert_eq!(json["timed_out"], false);
    assert!(!json["synthesis"]["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_task_is_404() {
    let (base, _state) = start_test_server().await;
    let (status, body) = get(&base, "/api/v1/tasks/task_0_0").await;
    assert_eq!(status, 404);
    assert!(body.contains("NOT_FOUND"));

    let (status, _) = get(&base, "/api/v1/tasks/..%2Fsecret").await;
    assert_eq!(status, 404);
}
