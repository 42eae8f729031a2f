//! Integration tests for the showrun HTTP API
//!
//! Drives the router with `tower::ServiceExt::oneshot` against a live engine
//! task on a manual clock:
//! - Health and build info
//! - Playback commands and their status codes
//! - Rundown and message endpoints
//! - SSE initial snapshot

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use futures::StreamExt;
use http::{Method, Request};
use serde_json::{json, Value};
use showrun_common::events::{CyclePhase, ShowSnapshot, TimerState};
use showrun_common::time::ManualTime;
use tower::ServiceExt;

use showrun_engine::api::{build_router, AppContext};
use showrun_engine::config::HttpTriggers;
use showrun_engine::integrations::NullIntegrations;
use showrun_engine::playback::{spawn_engine, PlaybackEngine};
use showrun_engine::state::SharedState;

/// Router backed by a running engine task, rundown a/b/c installed
async fn setup_test_server() -> (axum::Router, Arc<SharedState>) {
    let state = Arc::new(SharedState::new());
    let engine = PlaybackEngine::new(
        Arc::new(ManualTime::new(0)),
        Arc::new(NullIntegrations),
        state.clone(),
        HttpTriggers::default(),
    );
    let (handle, _task) = spawn_engine(engine, Duration::from_secs(10));

    let router = build_router(AppContext {
        engine: handle,
        state: state.clone(),
    });

    let (status, _) = make_request(
        &router,
        Method::PUT,
        "/api/v1/rundown",
        Some(json!([
            { "id": "a", "timeStart": 0, "timeEnd": 60000, "title": "Opening" },
            { "id": "b", "timeStart": 60000, "timeEnd": 120000, "isPublic": true },
            { "id": "c", "timeStart": 180000, "timeEnd": 240000 }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (router, state)
}

async fn make_request(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(path);

    let request = match body {
        Some(json_body) => {
            request = request.header("content-type", "application/json");
            request.body(Body::from(json_body.to_string())).unwrap()
        }
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_snapshot(app: &axum::Router) -> ShowSnapshot {
    let (status, body) = make_request(app, Method::GET, "/api/v1/playback/state", None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_test_server().await;

    let (status, body) = make_request(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "showrun");
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let (app, _) = setup_test_server().await;

    let (status, body) = make_request(&app, Method::GET, "/build_info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test]
async fn test_load_and_start() {
    let (app, _) = setup_test_server().await;

    let (status, body) = make_request(&app, Method::POST, "/api/v1/playback/load/id/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.phase, CyclePhase::Armed);
    assert_eq!(snapshot.selection.id.as_deref(), Some("a"));
    assert_eq!(snapshot.selection.total, 3);
    assert_eq!(snapshot.titles.private.now.unwrap().title, "Opening");
    assert_eq!(snapshot.timer.running, Some(60.0));

    let (status, _) = make_request(&app, Method::POST, "/api/v1/playback/start", None).await;
    assert_eq!(status, StatusCode::OK);

    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.phase, CyclePhase::OnUpdate);
    assert_eq!(snapshot.play_state, TimerState::Start);
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let (app, _) = setup_test_server().await;

    let (status, body) = make_request(&app, Method::POST, "/api/v1/playback/rewind", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["status"].as_str().unwrap().contains("rewind"));
}

#[tokio::test]
async fn test_load_unknown_cue_is_not_found() {
    let (app, _) = setup_test_server().await;

    let (status, _) = make_request(&app, Method::POST, "/api/v1/playback/load/id/zz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = make_request(&app, Method::POST, "/api/v1/playback/load/index/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = make_request(&app, Method::POST, "/api/v1/playback/load/index/2", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_increment_bounds() {
    let (app, _) = setup_test_server().await;
    make_request(&app, Method::POST, "/api/v1/playback/load/index/0", None).await;

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/v1/playback/increment",
        Some(json!({ "amount_ms": 600000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Extremes are rejected without taking the engine down
    for extreme in [i64::MIN, i64::MAX] {
        let (status, _) = make_request(
            &app,
            Method::POST,
            "/api/v1/playback/increment",
            Some(json!({ "amount_ms": extreme })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/v1/playback/increment",
        Some(json!({ "amount_ms": 30000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(get_snapshot(&app).await.timer.running, Some(90.0));
}

// =============================================================================
// Rundown and messages
// =============================================================================

#[tokio::test]
async fn test_patch_and_delete_cue() {
    let (app, _) = setup_test_server().await;
    make_request(&app, Method::POST, "/api/v1/playback/load/id/c", None).await;

    let (status, _) = make_request(
        &app,
        Method::PATCH,
        "/api/v1/rundown/c",
        Some(json!({ "title": "Closing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.titles.private.now.unwrap().title, "Closing");

    let (status, _) = make_request(&app, Method::DELETE, "/api/v1/rundown/a", None).await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.selection.index, Some(1));
    assert_eq!(snapshot.selection.total, 2);

    let (status, _) = make_request(&app, Method::DELETE, "/api/v1/rundown/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rundown_keeps_selection() {
    let (app, _) = setup_test_server().await;
    make_request(&app, Method::POST, "/api/v1/playback/load/id/b", None).await;

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/v1/rundown",
        Some(json!([
            { "id": "b", "timeStart": 60000, "timeEnd": 120000 },
            { "id": "c", "timeStart": 180000, "timeEnd": 240000 }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.selection.id.as_deref(), Some("b"));
    assert_eq!(snapshot.selection.index, Some(0));
}

#[tokio::test]
async fn test_set_message() {
    let (app, _) = setup_test_server().await;

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/v1/messages/presenter",
        Some(json!({ "text": "Two minutes", "visible": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let snapshot = get_snapshot(&app).await;
    assert_eq!(snapshot.messages.presenter.text, "Two minutes");
    assert!(snapshot.messages.presenter.visible);

    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/v1/messages/sidebar",
        Some(json!({ "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// SSE
// =============================================================================

#[tokio::test]
async fn test_sse_sends_cached_snapshot_first() {
    let (app, state) = setup_test_server().await;
    make_request(&app, Method::POST, "/api/v1/playback/load/id/a", None).await;
    assert!(state.last_snapshot().is_some());

    let request = Request::builder()
        .uri("/api/v1/events")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut stream = response.into_body().into_data_stream();
    let first = tokio::time::timeout(Duration::from_secs(2), stream.next())
        .await
        .expect("no SSE frame in time")
        .unwrap()
        .unwrap();
    let frame = String::from_utf8(first.to_vec()).unwrap();
    assert!(frame.starts_with("event: State"));
    assert!(frame.contains("\"phase\":\"armed\""));
}
