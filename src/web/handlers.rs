//! HTTP query handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::chat::{ChatEngine, ChatMessage, User, DEFAULT_ROOM};

/// The engine behind its event-serializing mutex.
pub type SharedEngine = Arc<Mutex<ChatEngine>>;

/// Query parameters for the message listing.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    /// Room to read from; defaults to "General" and is created if absent.
    pub room: Option<String>,
    /// Page size; defaults to the configured limit.
    pub limit: Option<usize>,
    /// Only messages strictly earlier than this instant.
    pub before: Option<DateTime<Utc>>,
}

/// GET / — liveness banner.
pub async fn index() -> &'static str {
    "parley chat server is running"
}

/// GET /health — health check.
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/rooms — sorted list of room names.
pub async fn list_rooms(State(engine): State<SharedEngine>) -> Json<Vec<String>> {
    Json(engine.lock().await.room_names())
}

/// GET /api/messages — ascending page of messages from a room.
pub async fn list_messages(
    State(engine): State<SharedEngine>,
    Query(query): Query<MessagesQuery>,
) -> Json<Vec<ChatMessage>> {
    let room = query.room.as_deref().unwrap_or(DEFAULT_ROOM);
    Json(
        engine
            .lock()
            .await
            .page_messages(room, query.limit, query.before),
    )
}

/// GET /api/users — all currently registered users.
pub async fn list_users(State(engine): State<SharedEngine>) -> Json<Vec<User>> {
    Json(engine.lock().await.users())
}
