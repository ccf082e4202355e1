//! parley — real-time room-based chat server.
//!
//! A single-process, in-memory chat engine: room membership and presence,
//! bounded per-room message logs with cursor pagination, typing indicators,
//! reactions, read receipts, and private messages, exposed over a WebSocket
//! event protocol and a small HTTP query API. State is volatile by design;
//! nothing survives a restart.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod web;

pub use chat::{ChatEngine, ChatMessage, ClientEvent, ConnectionId, ServerEvent, User};
pub use config::Config;
pub use error::{ParleyError, Result};
pub use web::{SharedEngine, WebServer};
