//! Wire protocol events.
//!
//! One JSON object per event, tagged with a snake_case `type` field and
//! carrying camelCase payload fields. These types are the engine's inbound
//! and outbound language and are independent of any transport.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::connection::{ConnectionId, User};
use super::message::{ChatMessage, MessageId, PrivateMessage};
use super::DEFAULT_ROOM;

fn default_room() -> String {
    DEFAULT_ROOM.to_string()
}

/// Events sent from client to server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Identify this connection and join a room (default "General").
    UserJoin {
        username: String,
        #[serde(default = "default_room")]
        room: String,
    },
    /// Switch to a different room, leaving the current one.
    JoinRoom { room: String },
    /// Leave a room explicitly.
    LeaveRoom { room: String },
    /// Send a message to a room; falls back to the current room, then
    /// "General", when no room is given.
    SendMessage {
        message: String,
        #[serde(default)]
        room: Option<String>,
    },
    /// Start or stop composing in the current room.
    Typing {
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
    /// Send a point-to-point message to another connection.
    PrivateMessage { to: ConnectionId, message: String },
    /// Confirm this connection has viewed a message.
    MessageRead {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        room: String,
    },
    /// Toggle a reaction on a message.
    ReactMessage {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        room: String,
        reaction: String,
    },
}

/// Events sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full membership snapshot of a room.
    UserList { users: Vec<User> },
    /// A user joined a room.
    UserJoined {
        username: String,
        id: ConnectionId,
        room: String,
    },
    /// A user left a room.
    UserLeft {
        username: String,
        id: ConnectionId,
        room: String,
    },
    /// A room message, fanned out to all members.
    ReceiveMessage { message: ChatMessage },
    /// Store-accepted acknowledgment, unicast to the sender.
    MessageDelivered {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        room: String,
    },
    /// Display names currently typing in the room.
    TypingUsers { users: Vec<String> },
    /// A private message, delivered to target and echoed to sender.
    PrivateMessage { message: PrivateMessage },
    /// Read notification, unicast to the original sender.
    MessageRead {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        reader: User,
    },
    /// Updated reaction map for a message.
    MessageReactionUpdate {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        reactions: BTreeMap<String, Vec<ConnectionId>>,
    },
    /// Updated read-receipt set for a message.
    MessageReadUpdate {
        #[serde(rename = "messageId")]
        message_id: MessageId,
        #[serde(rename = "readBy")]
        read_by: Vec<ConnectionId>,
    },
}
