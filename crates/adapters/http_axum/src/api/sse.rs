//! Server-Sent Events (SSE) stream of domain events.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};

use crate::state::AppState;

/// `GET /api/events/stream`: SSE stream of real-time domain events.
///
/// Each domain event is sent as a JSON `data:` frame. User-facing events
/// (auto-off, admission refusals, saved settings) use the SSE event name
/// `notice`, everything else `update`, so a client can redraw on the latter
/// and pop a message on the former.
///
/// The stream ends when the server's shutdown token is cancelled, so an
/// open subscriber never holds up a graceful shutdown.
pub async fn stream<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => {
                let name = if event.is_notice() { "notice" } else { "update" };
                Some(Ok(Event::default().event(name).data(json)))
            }
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    let event_stream =
        futures_util::StreamExt::take_until(event_stream, state.shutdown.cancelled_owned());

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
