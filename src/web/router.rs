//! Router configuration for the Web API.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, index, list_messages, list_rooms, list_users, SharedEngine};
use super::ws::ws_handler;

/// Create the main router: WebSocket endpoint plus the query API.
pub fn create_router(engine: SharedEngine, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/rooms", get(list_rooms))
        .route("/messages", get(list_messages))
        .route("/users", get(list_users));

    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(engine)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// CORS layer from configured origins; empty means any origin.
fn create_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use crate::chat::ChatEngine;
    use crate::config::ChatConfig;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }

    #[test]
    fn test_create_router_with_cors_origins() {
        let engine = Arc::new(Mutex::new(ChatEngine::new(&ChatConfig::default())));
        let _router = create_router(engine, &["http://localhost:5173".to_string()]);
    }
}
