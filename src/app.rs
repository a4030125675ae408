use axum::{http::Uri, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::shared::{AppError, AppState};
use crate::websockets::websocket_handler;

/// Builds the HTTP surface: liveness, the room socket endpoint, CORS and
/// request tracing
pub fn build_router(app_state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ws/:room_id", get(websocket_handler))
        .fallback(not_found)
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// GET /
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "HushHour API is running"
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
