//! HTTP request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use showrun_common::events::{MessageKind, ShowSnapshot};
use showrun_common::{CueEvent, CuePatch};
use tracing::{error, info, warn};

use crate::api::server::AppContext;
use crate::error::Error;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct BuildInfoResponse {
    version: String,
    git_hash: String,
    build_timestamp: String,
    build_profile: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct IncrementRequest {
    amount_ms: i64,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    visible: Option<bool>,
}

type ApiError = (StatusCode, Json<StatusResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn api_error(code: StatusCode, status: impl Into<String>) -> ApiError {
    (
        code,
        Json(StatusResponse {
            status: status.into(),
        }),
    )
}

fn ok() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Map engine errors to HTTP status codes
fn engine_error(e: Error) -> ApiError {
    match e {
        Error::InvalidInput(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        other => {
            error!("Engine request failed: {}", other);
            api_error(StatusCode::SERVICE_UNAVAILABLE, format!("error: {}", other))
        }
    }
}

// ============================================================================
// Health Endpoints
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "showrun".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /build_info
pub async fn build_info() -> Json<BuildInfoResponse> {
    Json(BuildInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
    })
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// GET /api/v1/playback/state
pub async fn get_state(State(ctx): State<AppContext>) -> ApiResult<Json<ShowSnapshot>> {
    ctx.engine.snapshot().await.map(Json).map_err(engine_error)
}

/// POST /api/v1/playback/:action
pub async fn trigger(
    State(ctx): State<AppContext>,
    Path(action): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let accepted = ctx.engine.trigger(action.clone()).await.map_err(engine_error)?;
    if accepted {
        Ok(ok())
    } else {
        Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("unknown action: {}", action),
        ))
    }
}

/// POST /api/v1/playback/load/id/:id
pub async fn load_by_id(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    info!("Load cue request: {}", id);
    let loaded = ctx.engine.load_event_by_id(id.clone()).await.map_err(engine_error)?;
    if loaded {
        Ok(ok())
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("cue not found: {}", id)))
    }
}

/// POST /api/v1/playback/load/index/:index
pub async fn load_by_index(
    State(ctx): State<AppContext>,
    Path(index): Path<usize>,
) -> ApiResult<Json<StatusResponse>> {
    let loaded = ctx.engine.load_event_by_index(index).await.map_err(engine_error)?;
    if loaded {
        Ok(ok())
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            format!("no cue at index {}", index),
        ))
    }
}

/// POST /api/v1/playback/increment
pub async fn increment(
    State(ctx): State<AppContext>,
    Json(req): Json<IncrementRequest>,
) -> ApiResult<Json<StatusResponse>> {
    ctx.engine
        .increment(req.amount_ms)
        .await
        .map_err(engine_error)?;
    Ok(ok())
}

// ============================================================================
// Rundown Endpoints
// ============================================================================

/// PUT /api/v1/rundown - replace the rundown and reset playback
pub async fn setup_rundown(
    State(ctx): State<AppContext>,
    Json(events): Json<Vec<CueEvent>>,
) -> ApiResult<Json<StatusResponse>> {
    info!("Rundown setup with {} cues", events.len());
    ctx.engine
        .setup_with_event_list(events)
        .await
        .map_err(engine_error)?;
    Ok(ok())
}

/// POST /api/v1/rundown - replace the rundown keeping the loaded cue
pub async fn update_rundown(
    State(ctx): State<AppContext>,
    Json(events): Json<Vec<CueEvent>>,
) -> ApiResult<Json<StatusResponse>> {
    ctx.engine
        .update_event_list(events)
        .await
        .map_err(engine_error)?;
    Ok(ok())
}

/// PATCH /api/v1/rundown/:id
pub async fn update_event(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(patch): Json<CuePatch>,
) -> ApiResult<Json<StatusResponse>> {
    let found = ctx
        .engine
        .update_single_event(id.clone(), patch)
        .await
        .map_err(engine_error)?;
    if found {
        Ok(ok())
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("cue not found: {}", id)))
    }
}

/// DELETE /api/v1/rundown/:id
pub async fn delete_event(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let found = ctx.engine.delete_id(id.clone()).await.map_err(engine_error)?;
    if found {
        Ok(ok())
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("cue not found: {}", id)))
    }
}

// ============================================================================
// Message Endpoints
// ============================================================================

/// POST /api/v1/messages/:kind
pub async fn set_message(
    State(ctx): State<AppContext>,
    Path(kind): Path<String>,
    Json(req): Json<MessageRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let kind: MessageKind = kind.parse().map_err(|e: String| {
        warn!("Rejected message update: {}", e);
        api_error(StatusCode::BAD_REQUEST, e)
    })?;

    ctx.engine
        .set_message(kind, req.text, req.visible)
        .await
        .map_err(engine_error)?;
    Ok(ok())
}
