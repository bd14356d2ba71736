//! Server-sent events.
//!
//! Streams the out-of-band fragments produced by timers (notification fades,
//! particles, counters, modal transitions). The page listens with the htmx
//! SSE extension and swaps each `patch` event.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use crate::state::AppState;

/// Name of the SSE event carrying fragments.
pub const PATCH_EVENT: &str = "patch";

/// Stream timer-driven fragments.
///
/// GET /events
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Event stream opened");
    let patches = BroadcastStream::new(state.ui().subscribe()).filter_map(|patch| match patch {
        Ok(html) => Some(Ok(patch_event(&html))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Event stream lagged, dropping fragments");
            None
        }
    });

    Sse::new(patches).keep_alive(KeepAlive::default())
}

/// SSE data may not contain carriage returns.
fn patch_event(html: &str) -> Event {
    Event::default().event(PATCH_EVENT).data(html.replace('\r', ""))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use super::*;

    async fn wire_format(event: Event) -> String {
        let events = tokio_stream::iter([Ok::<_, Infallible>(event)]);
        let body = Sse::new(events).into_response().into_body();
        String::from_utf8(to_bytes(body, usize::MAX).await.unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_patch_event_strips_carriage_returns() {
        let wire = wire_format(patch_event("<div id=\"a\">\r\n</div>")).await;
        assert_eq!(wire, "event: patch\ndata: <div id=\"a\">\ndata: </div>\n\n");
    }
}
