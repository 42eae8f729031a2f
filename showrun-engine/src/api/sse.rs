//! Server-Sent Events stream of broadcast events
//!
//! A new client first receives the latest full snapshot (if any), then every
//! event published afterwards.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use showrun_common::events::ShowEvent;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::api::server::AppContext;

/// GET /api/v1/events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        "New SSE client connected ({} subscribers)",
        ctx.state.subscriber_count() + 1
    );

    // Subscribe before reading the cache so nothing falls in between
    let rx = ctx.state.subscribe_events();
    let initial = ctx
        .state
        .last_snapshot()
        .map(|snapshot| ShowEvent::State(Box::new(snapshot)));

    let live = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Some(event),
            Err(e) => {
                // Lagged receiver; the next event catches it up
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    let stream = stream::iter(initial)
        .chain(live)
        .filter_map(|event| async move { to_sse(&event).map(Ok) });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_sse(event: &ShowEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().event(event.event_type()).data(json)),
        Err(e) => {
            warn!("Failed to serialize event: {}", e);
            None
        }
    }
}
