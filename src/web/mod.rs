//! Web layer for parley.
//!
//! Thin transport over the chat engine: a WebSocket endpoint carrying the
//! JSON event protocol and a read-only HTTP query surface.

pub mod handlers;
pub mod router;
pub mod server;
pub mod ws;

pub use handlers::SharedEngine;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
