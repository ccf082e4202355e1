//! Test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use tokio::sync::{mpsc, Mutex};

use parley::chat::{ChatEngine, ConnectionId, ServerEvent};
use parley::config::ChatConfig;
use parley::web::{create_health_router, create_router, SharedEngine};

/// A fresh engine with default configuration.
pub fn shared_engine() -> SharedEngine {
    Arc::new(Mutex::new(ChatEngine::new(&ChatConfig::default())))
}

/// An in-process test server over the full router.
pub fn test_server(engine: SharedEngine) -> TestServer {
    let router = create_router(engine, &[]).merge(create_health_router());
    TestServer::new(router).expect("failed to build test server")
}

/// Attach a connection and return its id plus the outbox receiver.
pub async fn attach(engine: &SharedEngine) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (engine.lock().await.attach(tx), rx)
}

/// Collect every event currently queued on an outbox.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
