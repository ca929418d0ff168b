//! The collaboration hub: document-scoped connection registry and fan-out.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use draftroom_core::config::realtime::RealtimeConfig;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::message::types::ServerEvent;

/// Registry of live connections grouped by document.
///
/// Both maps are hub-private. Sends are non-blocking (each connection owns
/// a buffered channel drained by its transport task), so registry mutation
/// never suspends and broadcasts always iterate a snapshot of the
/// connection list — a disconnect triggered by a failed send mid-broadcast
/// cannot corrupt the sweep.
///
/// State is in-memory only and lives as long as the process; clients
/// re-handshake after a restart.
#[derive(Debug)]
pub struct CollabHub {
    /// Connection ID → handle.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Document ID → connection IDs in join order.
    documents: DashMap<Uuid, Vec<ConnectionId>>,
    /// Outbound buffer per connection.
    buffer_size: usize,
    /// Connection cap per document.
    max_per_document: usize,
}

impl CollabHub {
    /// Create a new hub from configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            connections: DashMap::new(),
            documents: DashMap::new(),
            buffer_size: config.channel_buffer_size,
            max_per_document: config.max_connections_per_document,
        }
    }

    /// Register a connection under a document.
    ///
    /// Broadcasts `user_joined` (with the now-current active-user list) to
    /// every *other* connection on the document. Returns the handle and the
    /// receiver the transport task drains.
    pub fn connect(
        &self,
        document_id: Uuid,
        display_name: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        // At capacity the oldest connection gives way.
        let evict = self.documents.get(&document_id).and_then(|ids| {
            if ids.len() >= self.max_per_document {
                ids.first().copied()
            } else {
                None
            }
        });
        if let Some(oldest) = evict {
            warn!(
                document_id = %document_id,
                max = self.max_per_document,
                "Document at max connections, dropping oldest"
            );
            self.disconnect(oldest);
        }

        let (handle, rx) = ConnectionHandle::new(document_id, display_name, self.buffer_size);
        self.connections.insert(handle.id, Arc::clone(&handle));
        self.documents
            .entry(document_id)
            .or_default()
            .push(handle.id);

        info!(
            conn_id = %handle.id,
            document_id = %document_id,
            user = %handle.display_name,
            "Connection registered"
        );

        let event = ServerEvent::UserJoined {
            user: handle.display_name.clone(),
            active_users: self.active_users(document_id),
        };
        self.broadcast(document_id, &event, Some(handle.id));

        (handle, rx)
    }

    /// Remove a connection from the registry. Idempotent.
    ///
    /// Broadcasts `user_left` with the updated active-user list to the
    /// remaining connections; the document's entry disappears once its last
    /// connection goes.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        let Some((_, handle)) = self.connections.remove(&conn_id) else {
            return;
        };
        handle.mark_dead();

        let document_id = handle.document_id;
        let mut now_empty = false;
        if let Some(mut ids) = self.documents.get_mut(&document_id) {
            ids.retain(|id| *id != conn_id);
            now_empty = ids.is_empty();
        }
        if now_empty {
            self.documents.remove_if(&document_id, |_, ids| ids.is_empty());
        }

        info!(
            conn_id = %conn_id,
            document_id = %document_id,
            user = %handle.display_name,
            "Connection unregistered"
        );

        let event = ServerEvent::UserLeft {
            user: handle.display_name.clone(),
            active_users: self.active_users(document_id),
        };
        self.broadcast(document_id, &event, None);
    }

    /// Broadcast an event to a document's connections, optionally excluding
    /// one (typically the sender).
    pub fn broadcast(&self, document_id: Uuid, event: &ServerEvent, exclude: Option<ConnectionId>) {
        match serde_json::to_string(event) {
            Ok(frame) => self.broadcast_frame(document_id, &frame, exclude),
            Err(e) => warn!(error = %e, "Failed to serialize event"),
        }
    }

    /// Broadcast an opaque JSON payload verbatim.
    pub fn broadcast_value(
        &self,
        document_id: Uuid,
        payload: &Value,
        exclude: Option<ConnectionId>,
    ) {
        self.broadcast_frame(document_id, &payload.to_string(), exclude);
    }

    /// Deliver a serialized frame to every live connection of a document.
    ///
    /// A failed send marks that connection dead and never aborts delivery
    /// to the rest; dead connections are disconnected after the sweep,
    /// which triggers their `user_left` side effect.
    fn broadcast_frame(&self, document_id: Uuid, frame: &str, exclude: Option<ConnectionId>) {
        let targets: Vec<Arc<ConnectionHandle>> = match self.documents.get(&document_id) {
            Some(ids) => ids
                .iter()
                .filter(|id| Some(**id) != exclude)
                .filter_map(|id| self.connections.get(id).map(|h| Arc::clone(&h)))
                .collect(),
            None => return,
        };

        let mut dead = Vec::new();
        for handle in &targets {
            if !handle.send(frame.to_string()) {
                dead.push(handle.id);
            }
        }

        for conn_id in dead {
            warn!(
                conn_id = %conn_id,
                document_id = %document_id,
                "Send failed, dropping connection"
            );
            self.disconnect(conn_id);
        }
    }

    /// Best-effort unicast to a single connection.
    pub fn send_direct(&self, conn_id: ConnectionId, event: &ServerEvent) -> bool {
        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to serialize event");
                return false;
            }
        };
        match self.connections.get(&conn_id) {
            Some(handle) => {
                let sent = handle.send(frame);
                if !sent {
                    debug!(conn_id = %conn_id, "Direct send failed");
                }
                sent
            }
            None => false,
        }
    }

    /// Relay a cursor position to everyone but the sender.
    pub fn broadcast_cursor(
        &self,
        document_id: Uuid,
        user: &str,
        position: Value,
        sender: ConnectionId,
    ) {
        let event = ServerEvent::CursorPosition {
            user: user.to_string(),
            position,
        };
        self.broadcast(document_id, &event, Some(sender));
    }

    /// Announce a saved version to all of a document's connections.
    ///
    /// No exclusion: the saving client also wants the confirmation.
    pub fn broadcast_save_event(&self, document_id: Uuid, version: Value, user: &str) {
        let event = ServerEvent::VersionSaved {
            user: user.to_string(),
            version,
        };
        self.broadcast(document_id, &event, None);
    }

    /// Display names of a document's connections, in join order.
    pub fn active_users(&self, document_id: Uuid) -> Vec<String> {
        match self.documents.get(&document_id) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.connections.get(id).map(|h| h.display_name.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of live connections on a document.
    pub fn connection_count(&self, document_id: Uuid) -> usize {
        self.documents
            .get(&document_id)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }
}
