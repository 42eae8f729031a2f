//! HTTP server setup and routing
//!
//! Sets up the Axum router for control endpoints and SSE.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::playback::EngineHandle;
use crate::state::SharedState;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub engine: EngineHandle,
    pub state: Arc<SharedState>,
}

/// Build the router with all routes
pub fn build_router(ctx: AppContext) -> Router {
    let api = Router::new()
        // Playback
        .route("/playback/state", get(super::handlers::get_state))
        .route("/playback/increment", post(super::handlers::increment))
        .route("/playback/load/id/:id", post(super::handlers::load_by_id))
        .route("/playback/load/index/:index", post(super::handlers::load_by_index))
        .route("/playback/:action", post(super::handlers::trigger))
        // Rundown
        .route(
            "/rundown",
            put(super::handlers::setup_rundown).post(super::handlers::update_rundown),
        )
        .route(
            "/rundown/:id",
            axum::routing::patch(super::handlers::update_event)
                .delete(super::handlers::delete_event),
        )
        // Messages
        .route("/messages/:kind", post(super::handlers::set_message))
        // SSE event stream
        .route("/events", get(super::sse::event_stream));

    Router::new()
        .route("/health", get(super::handlers::health))
        .route("/build_info", get(super::handlers::build_info))
        .nest("/api/v1", api)
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until `shutdown` resolves
pub async fn run(
    ctx: AppContext,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
