// Public API
pub use broadcaster::Broadcaster;
pub use handler::{handle_websocket_connection, websocket_handler};
pub use messages::{
    NewQuestionPayload, QuestionUpdatePayload, RoomEvent, HEARTBEAT_PING, HEARTBEAT_PONG,
};
pub use registry::{
    ConnectionHandle, ConnectionId, DeliveryError, InMemoryRoomRegistry, RoomRegistry,
};
pub use socket::{Session, SessionState, SocketError, SocketWrapper};

// Internal modules
mod broadcaster;
mod handler;
mod messages;
mod registry;
mod socket;
