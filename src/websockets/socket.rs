use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use super::messages::{HEARTBEAT_PING, HEARTBEAT_PONG};
use super::registry::{ConnectionHandle, ConnectionId, RoomRegistry};

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Binary and transport-level ping/pong frames carry nothing for us
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Joined,
    Closed,
}

/// One client's membership of a room, from accept until disconnect.
///
/// Running the session registers it with the room, relays broadcast frames
/// from its outbound channel to the socket, answers heartbeats, and
/// deregisters it however the connection ends.
pub struct Session {
    connection_id: ConnectionId,
    room_id: String,
    socket: Box<dyn SocketWrapper>,
    registry: Arc<dyn RoomRegistry>,
    state: SessionState,
}

impl Session {
    pub fn new(
        room_id: String,
        socket: Box<dyn SocketWrapper>,
        registry: Arc<dyn RoomRegistry>,
    ) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            room_id,
            socket,
            registry,
            state: SessionState::Connecting,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session until the connection ends. The session is always
    /// removed from its room before this returns.
    pub async fn run(mut self) -> Result<(), SocketError> {
        let (outbound_sender, mut outbound_receiver) = mpsc::unbounded_channel::<String>();
        let handle = ConnectionHandle::new(self.connection_id, outbound_sender);

        self.registry.join(&self.room_id, handle).await;
        self.transition(SessionState::Joined);

        let result = self.relay(&mut outbound_receiver).await;

        // Close the outbound channel first so concurrent broadcasts fail fast
        drop(outbound_receiver);
        self.registry
            .leave(&self.room_id, &self.connection_id)
            .await;

        if result.is_ok() {
            let _ = self.socket.close().await;
        }
        self.transition(SessionState::Closed);

        result
    }

    async fn relay(
        &mut self,
        outbound_receiver: &mut mpsc::UnboundedReceiver<String>,
    ) -> Result<(), SocketError> {
        loop {
            tokio::select! {
                // Handle outbound messages (broadcasts to client)
                msg = outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.socket.send_message(message).await?,
                        None => return Ok(()), // Evicted, nobody can reach us anymore
                    }
                }

                // Handle inbound messages (from client)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => self.handle_inbound(message).await?,
                        Ok(None) => return Ok(()), // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    async fn handle_inbound(&mut self, message: String) -> Result<(), SocketError> {
        if message == HEARTBEAT_PING {
            return self.socket.send_message(HEARTBEAT_PONG.to_string()).await;
        }

        debug!(
            room_id = %self.room_id,
            connection_id = %self.connection_id,
            message = %message,
            "Ignoring inbound message"
        );
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            room_id = %self.room_id,
            connection_id = %self.connection_id,
            from = ?self.state,
            to = ?next,
            "Session state changed"
        );
        self.state = next;
    }
}
