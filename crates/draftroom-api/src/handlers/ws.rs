//! WebSocket handshake and collaboration message loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use draftroom_realtime::{ClientMessage, CollabHub, ConnectionHandle, ServerEvent};

use crate::state::AppState;

/// Handshake query parameters.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Display name shown to other editors.
    #[serde(default = "default_user")]
    pub user: String,
}

fn default_user() -> String {
    "anonymous".to_string()
}

/// GET /ws/documents/{id}?user={name} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, document_id, query.user, socket))
}

/// Drives one established connection until the transport closes.
async fn handle_socket(state: AppState, document_id: Uuid, user: String, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.hub.connect(document_id, user);
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        document_id = %document_id,
        user = %handle.display_name,
        "WebSocket connection established"
    );

    // Forward hub frames to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Process inbound frames until disconnect or transport error.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                dispatch_client_frame(&state.hub, &handle, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Termination always triggers exactly one disconnect.
    outbound_task.abort();
    state.hub.disconnect(conn_id);

    info!(
        conn_id = %conn_id,
        document_id = %document_id,
        "WebSocket connection closed"
    );
}

/// Route one inbound frame per the collaboration protocol.
///
/// A frame that fails to decode is logged and dropped; the connection
/// stays up until the transport itself reports closure.
pub fn dispatch_client_frame(hub: &CollabHub, conn: &ConnectionHandle, frame: &str) {
    let message = match ClientMessage::parse(frame) {
        Ok(message) => message,
        Err(e) => {
            warn!(conn_id = %conn.id, error = %e, "Undecodable collaboration frame");
            return;
        }
    };

    match message {
        ClientMessage::CursorPosition { position } => {
            hub.broadcast_cursor(conn.document_id, &conn.display_name, position, conn.id);
        }
        ClientMessage::Selection { selection } => {
            hub.broadcast(
                conn.document_id,
                &ServerEvent::Selection {
                    user: conn.display_name.clone(),
                    selection,
                },
                Some(conn.id),
            );
        }
        ClientMessage::Typing { is_typing } => {
            hub.broadcast(
                conn.document_id,
                &ServerEvent::Typing {
                    user: conn.display_name.clone(),
                    is_typing,
                },
                Some(conn.id),
            );
        }
        ClientMessage::Ping => {
            hub.send_direct(conn.id, &ServerEvent::Pong);
        }
        ClientMessage::Other(payload) => {
            hub.broadcast_value(conn.document_id, &payload, Some(conn.id));
        }
    }
}
