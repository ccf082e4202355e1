//! Message types.
//!
//! Stored room messages carry read receipts and reactions and are mutated
//! in place; private messages are delivered point-to-point and never stored.
//! Wire field names are camelCase to match the client protocol.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::connection::ConnectionId;

/// Message id, monotonic and unique within the process lifetime.
pub type MessageId = u64;

/// A message stored in a room's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Creation-ordered id.
    pub id: MessageId,
    /// Sender's display name.
    pub sender: String,
    /// Sender's connection id.
    pub sender_id: ConnectionId,
    /// Room the message belongs to.
    pub room: String,
    /// Message text.
    #[serde(rename = "message")]
    pub content: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// Connection ids that have read the message, each at most once.
    pub read_by: Vec<ConnectionId>,
    /// Reaction symbol to the connection ids that applied it. Empty sets
    /// are removed together with their key.
    pub reactions: BTreeMap<String, Vec<ConnectionId>>,
}

impl ChatMessage {
    /// Create a new room message.
    pub fn new(
        id: MessageId,
        sender: impl Into<String>,
        sender_id: ConnectionId,
        room: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            sender_id,
            room: room.into(),
            content: content.into(),
            timestamp: Utc::now(),
            read_by: Vec::new(),
            reactions: BTreeMap::new(),
        }
    }

    /// Record that a user has read the message.
    ///
    /// Returns false if the user had already read it.
    pub fn mark_read(&mut self, reader: ConnectionId) -> bool {
        if self.read_by.contains(&reader) {
            return false;
        }
        self.read_by.push(reader);
        true
    }

    /// Toggle a user's reaction with the given symbol.
    ///
    /// Adds the user if absent, removes them if present; a symbol whose
    /// set becomes empty is dropped from the map. Returns true if the
    /// reaction is present after the call.
    pub fn toggle_reaction(&mut self, reaction: impl Into<String>, user: ConnectionId) -> bool {
        let reaction = reaction.into();
        let users = self.reactions.entry(reaction.clone()).or_default();
        if let Some(pos) = users.iter().position(|u| *u == user) {
            users.remove(pos);
            if users.is_empty() {
                self.reactions.remove(&reaction);
            }
            false
        } else {
            users.push(user);
            true
        }
    }
}

/// A point-to-point message, delivered once and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessage {
    /// Creation-ordered id, allocated from the same sequence as room messages.
    pub id: MessageId,
    /// Sender's display name.
    pub sender: String,
    /// Sender's connection id.
    pub sender_id: ConnectionId,
    /// Message text.
    #[serde(rename = "message")]
    pub content: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    /// Always true; distinguishes private payloads on the wire.
    pub is_private: bool,
}

impl PrivateMessage {
    /// Create a new private message.
    pub fn new(
        id: MessageId,
        sender: impl Into<String>,
        sender_id: ConnectionId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            sender_id,
            content: content.into(),
            timestamp: Utc::now(),
            is_private: true,
        }
    }
}
