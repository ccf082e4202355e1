//! Chat WebSocket handler.
//!
//! One text frame carries one JSON event. Outbound events flow from the
//! engine through the connection's outbox into a writer task; inbound
//! frames are parsed and dispatched under the engine lock, one event at a
//! time. Malformed frames are logged and ignored.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::chat::ClientEvent;

use super::handlers::SharedEngine;

/// GET /ws — upgrade to the chat protocol.
pub async fn ws_handler(ws: WebSocketUpgrade, State(engine): State<SharedEngine>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, engine))
}

/// Drive one connection until the socket closes.
async fn handle_socket(socket: WebSocket, engine: SharedEngine) {
    let (outbox, mut events) = mpsc::unbounded_channel();
    let conn_id = engine.lock().await.attach(outbox);
    tracing::info!(connection = %conn_id, "websocket connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Forward engine events to the socket.
    let mut writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => engine.lock().await.handle(conn_id, event),
                            Err(e) => {
                                tracing::debug!(connection = %conn_id, error = %e, "ignoring malformed event");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Pings are answered by axum during the read itself.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(connection = %conn_id, error = %e, "websocket error");
                        break;
                    }
                }
            }
            _ = &mut writer => break,
        }
    }

    engine.lock().await.disconnect(conn_id);
    writer.abort();
    tracing::info!(connection = %conn_id, "websocket closed");
}
