use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Identity of one accepted duplex connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Failure to hand a frame to a connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}

/// Outbound side of one client connection.
///
/// Frames are queued onto the connection's outbound channel, which its
/// session task drains onto the socket in order. Once the session has
/// finished the channel is closed and every send fails.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<String>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: mpsc::UnboundedSender<String>) -> Self {
        Self { id, sender }
    }

    /// Creates a handle with a fresh id along with the receiving end of its
    /// outbound channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::new(), sender), receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues a text frame for this connection without waiting on the socket
    pub fn send_text(&self, data: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(data.to_string())
            .map_err(|_| DeliveryError::Closed(self.id))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl Hash for ConnectionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Tracks which live connections belong to which room
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Registers a connection under a room, creating the room on first join
    async fn join(&self, room_id: &str, connection: ConnectionHandle);

    /// Removes a connection from a room. Unknown rooms and connections are
    /// ignored, so repeated calls are harmless.
    async fn leave(&self, room_id: &str, connection_id: &ConnectionId);

    /// Snapshot of the current members of a room, empty if the room is unknown
    async fn members_of(&self, room_id: &str) -> Vec<ConnectionHandle>;

    /// Number of rooms with at least one member
    async fn room_count(&self) -> usize;

    /// Number of connections across all rooms
    async fn connection_count(&self) -> usize;
}

pub struct InMemoryRoomRegistry {
    // room_id -> connection_id -> handle
    rooms: Arc<RwLock<HashMap<String, HashMap<ConnectionId, ConnectionHandle>>>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: &str, connection: ConnectionHandle) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room_id.to_string()).or_default();
        members.insert(connection.id(), connection);

        debug!(room_id = %room_id, members = members.len(), "Connection joined room");
    }

    async fn leave(&self, room_id: &str, connection_id: &ConnectionId) {
        let mut rooms = self.rooms.write().await;
        let Some(members) = rooms.get_mut(room_id) else {
            return;
        };

        if members.remove(connection_id).is_none() {
            return;
        }

        let remaining = members.len();
        if remaining == 0 {
            rooms.remove(room_id);
        }

        debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            members = remaining,
            "Connection left room"
        );
    }

    async fn members_of(&self, room_id: &str) -> Vec<ConnectionHandle> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn connection_count(&self) -> usize {
        self.rooms.read().await.values().map(HashMap::len).sum()
    }
}
