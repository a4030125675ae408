#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::timeout;

use hushhour::{SocketError, SocketWrapper};

// ============================================================================
// Mock Infrastructure
// ============================================================================

const FRAME_TIMEOUT: Duration = Duration::from_secs(1);
const SILENCE_WINDOW: Duration = Duration::from_millis(50);

/// Server side of an in-memory duplex connection
pub struct MockSocket {
    inbound: UnboundedReceiver<Result<String, SocketError>>,
    outbound: UnboundedSender<String>,
}

#[async_trait]
impl SocketWrapper for MockSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.outbound
            .send(message)
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        self.inbound.recv().await.transpose()
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        Ok(())
    }
}

/// Client side of an in-memory duplex connection
pub struct MockClient {
    to_server: Option<UnboundedSender<Result<String, SocketError>>>,
    from_server: Option<UnboundedReceiver<String>>,
}

pub fn mock_socket() -> (MockSocket, MockClient) {
    let (to_server, inbound) = mpsc::unbounded_channel();
    let (outbound, from_server) = mpsc::unbounded_channel();
    (
        MockSocket { inbound, outbound },
        MockClient {
            to_server: Some(to_server),
            from_server: Some(from_server),
        },
    )
}

impl MockClient {
    /// Send a text frame to the server
    pub fn send(&self, text: &str) {
        if let Some(sender) = &self.to_server {
            let _ = sender.send(Ok(text.to_string()));
        }
    }

    /// Make the server's next read fail as if the network dropped
    pub fn break_connection(&self) {
        if let Some(sender) = &self.to_server {
            let _ = sender.send(Err(SocketError::ReceiveFailed(
                "connection reset".to_string(),
            )));
        }
    }

    /// Close the client side gracefully
    pub fn disconnect(&mut self) {
        self.to_server = None;
    }

    /// Stop reading so every further server write fails
    pub fn stop_reading(&mut self) {
        self.from_server = None;
    }

    /// Next frame pushed by the server, None once the server side is gone
    pub async fn next_frame(&mut self) -> Option<String> {
        let receiver = self.from_server.as_mut()?;
        timeout(FRAME_TIMEOUT, receiver.recv())
            .await
            .expect("timed out waiting for a frame")
    }

    /// Assert nothing arrives within a short window
    pub async fn assert_no_frame(&mut self) {
        if let Some(receiver) = self.from_server.as_mut() {
            if let Ok(Some(frame)) = timeout(SILENCE_WINDOW, receiver.recv()).await {
                panic!("unexpected frame: {}", frame);
            }
        }
    }
}
