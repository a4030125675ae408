use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::shared::AppState;

use super::registry::RoomRegistry;
use super::socket::{Session, SocketWrapper};

/// WebSocket endpoint for room listeners
/// GET /ws/:room_id
///
/// Any room id is accepted; a room nobody broadcasts to just stays silent.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(app_state): State<AppState>,
) -> Response {
    info!(room_id = %room_id, "WebSocket connection requested");

    let registry = Arc::clone(app_state.broadcaster.registry());
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, room_id, registry))
}

/// Handle an accepted connection until it disconnects
pub async fn handle_websocket_connection<S>(
    socket: S,
    room_id: String,
    registry: Arc<dyn RoomRegistry>,
) where
    S: SocketWrapper + 'static,
{
    let session = Session::new(room_id.clone(), Box::new(socket), registry);
    let connection_id = session.connection_id();

    info!(
        room_id = %room_id,
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    match session.run().await {
        Ok(()) => {
            info!(
                room_id = %room_id,
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                room_id = %room_id,
                connection_id = %connection_id,
                error = %e,
                "WebSocket connection error"
            );
        }
    }
}
