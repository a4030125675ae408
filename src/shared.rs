use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::websockets::{Broadcaster, InMemoryRoomRegistry, RoomRegistry};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Broadcaster,
}

impl AppState {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            broadcaster: Broadcaster::new(registry),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRoomRegistry::new()))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
