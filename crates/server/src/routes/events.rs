use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use deployment::Deployment;
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::DeploymentImpl;

/// GET /api/events
/// Server-sent stream of record-change events. Each connected view
/// subscribes once and refreshes when an entity it shows mutates.
pub async fn subscribe_events(
    State(deployment): State<DeploymentImpl>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = deployment.events().subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| async move {
        match event {
            Ok(event) => Event::default()
                .event("record")
                .json_data(&event)
                .ok()
                .map(Ok),
            // A lagged subscriber skips what it missed; the next event
            // triggers a full refetch anyway.
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route("/events", get(subscribe_events))
}
