use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::registry::{ConnectionId, RoomRegistry};

/// Fans room events out to every connection currently in the room.
///
/// Delivery is best-effort: the caller learns nothing about individual
/// recipients. Connections that fail to accept the frame are evicted from
/// the room once the whole membership snapshot has been attempted.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<dyn RoomRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn RoomRegistry> {
        &self.registry
    }

    /// Serializes `message` once and delivers it to every member of the room
    #[instrument(skip(self, message))]
    pub async fn broadcast<T>(&self, room_id: &str, message: &T)
    where
        T: Serialize + ?Sized,
    {
        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(e) => {
                error!(room_id = %room_id, error = %e, "Failed to serialize broadcast message");
                return;
            }
        };

        self.broadcast_text(room_id, &frame).await;
    }

    /// Delivers an already serialized frame to every member of the room
    pub async fn broadcast_text(&self, room_id: &str, frame: &str) {
        let members = self.registry.members_of(room_id).await;
        if members.is_empty() {
            debug!(room_id = %room_id, "No listeners in room, dropping broadcast");
            return;
        }

        let failed: Vec<ConnectionId> = members
            .iter()
            .filter_map(|member| match member.send_text(frame) {
                Ok(()) => None,
                Err(e) => {
                    debug!(room_id = %room_id, error = %e, "Delivery failed");
                    Some(member.id())
                }
            })
            .collect();

        for connection_id in &failed {
            self.registry.leave(room_id, connection_id).await;
        }

        debug!(
            room_id = %room_id,
            members = members.len(),
            evicted = failed.len(),
            "Broadcast delivered"
        );
    }
}
