//! Chat engine for parley.
//!
//! This module contains the server-side chat state: connection registry,
//! rooms with bounded message logs, typing indicators, reactions, read
//! receipts, and the engine that dispatches inbound events and fans out
//! broadcasts. Everything here is transport-independent; the web layer
//! only moves serialized events over a socket.

pub mod connection;
pub mod engine;
pub mod events;
pub mod log;
pub mod message;
pub mod room;
pub mod typing;

pub use connection::{Connection, ConnectionId, ConnectionRegistry, User};
pub use engine::ChatEngine;
pub use events::{ClientEvent, ServerEvent};
pub use log::MessageLog;
pub use message::{ChatMessage, MessageId, PrivateMessage};
pub use room::Room;
pub use typing::TypingTracker;

/// Room used when an event does not name one.
pub const DEFAULT_ROOM: &str = "General";
