//! Individual collaboration connection handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single live connection.
///
/// Holds the sender half of the outbound frame channel plus the document
/// scope and display name the connection registered with. A connection
/// belongs to exactly one document for its lifetime.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// The document this connection is scoped to.
    pub document_id: Uuid,
    /// Display name shown to other editors.
    pub display_name: String,
    /// Sender for outbound frames.
    sender: mpsc::Sender<String>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new handle with an outbound buffer of `buffer` frames.
    ///
    /// Returns the handle and the receiver the transport task drains.
    pub fn new(
        document_id: Uuid,
        display_name: String,
        buffer: usize,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(buffer);
        let handle = Arc::new(Self {
            id: Uuid::new_v4(),
            document_id,
            display_name,
            sender: tx,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        });
        (handle, rx)
    }

    /// Push a frame to this connection without blocking.
    ///
    /// A full buffer drops the frame (slow consumer); a closed channel
    /// marks the connection dead. Returns whether the frame was enqueued.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    conn_id = %self.id,
                    "Connection send buffer full, dropping frame"
                );
                // Still alive; only the frame is lost.
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
