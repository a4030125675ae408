#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use tokio::task::JoinHandle;

use hushhour::{
    websockets::handle_websocket_connection, Broadcaster, ConnectionId, InMemoryRoomRegistry,
    RoomRegistry,
};

use super::mocks::{mock_socket, MockClient};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub registry: Arc<InMemoryRoomRegistry>,
    pub broadcaster: Broadcaster,
}

/// A client with a live session running on the server
pub struct ConnectedClient {
    pub client: MockClient,
    pub task: JoinHandle<()>,
}

impl ConnectedClient {
    /// Wait until the server has finished the session
    pub async fn closed(self) -> MockClient {
        self.task.await.expect("session task panicked");
        self.client
    }
}

impl TestSetup {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// Open a session in the room and wait until it is registered
    pub async fn connect(&self, room_id: &str) -> ConnectedClient {
        let (socket, mut client) = mock_socket();
        let registry: Arc<dyn RoomRegistry> = self.registry.clone();
        let task = tokio::spawn(handle_websocket_connection(
            socket,
            room_id.to_string(),
            registry,
        ));

        // The heartbeat reply proves the session has joined its room
        client.send("ping");
        assert_eq!(client.next_frame().await.as_deref(), Some("pong"));

        ConnectedClient { client, task }
    }

    pub async fn member_ids(&self, room_id: &str) -> Vec<ConnectionId> {
        self.registry
            .members_of(room_id)
            .await
            .iter()
            .map(|m| m.id())
            .collect()
    }
}
