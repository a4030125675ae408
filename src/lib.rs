// Library crate for the HushHour live Q&A broadcast server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::{ConfigError, ServerConfig};
pub use shared::{AppError, AppState};
pub use websockets::{
    Broadcaster, ConnectionHandle, ConnectionId, InMemoryRoomRegistry, RoomEvent, RoomRegistry,
    Session, SocketError, SocketWrapper,
};
