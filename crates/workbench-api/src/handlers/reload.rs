//! Server-sent reload stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};

use crate::state::AppState;

/// GET /api/reload
///
/// Emits `connected` once, then `reload` whenever a watched asset changes.
pub async fn reload_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state
        .reload
        .stream()
        .map(|event| Ok::<_, Infallible>(Event::default().data(event.as_str())));

    tracing::debug!(clients = state.reload.client_count(), "Reload client connected");

    Sse::new(stream).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(state.config.reload.keep_alive_seconds)),
    )
}
