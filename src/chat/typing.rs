//! Typing indicator tracker.
//!
//! Ephemeral per-room map of connections currently composing a message.
//! The engine only reflects the last signal received; clearing on a
//! stop-typing timeout is driven by the client's debounce timer.

use std::collections::HashMap;

use super::connection::ConnectionId;

/// Per-room, insertion-ordered typing entries.
#[derive(Debug, Default)]
pub struct TypingTracker {
    rooms: HashMap<String, Vec<(ConnectionId, String)>>,
}

impl TypingTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a connection's entry in a room's typing map.
    pub fn set(
        &mut self,
        room: impl Into<String>,
        id: ConnectionId,
        username: impl Into<String>,
        is_typing: bool,
    ) {
        let entries = self.rooms.entry(room.into()).or_default();
        let pos = entries.iter().position(|(entry_id, _)| *entry_id == id);
        match (is_typing, pos) {
            (true, Some(pos)) => entries[pos].1 = username.into(),
            (true, None) => entries.push((id, username.into())),
            (false, Some(pos)) => {
                entries.remove(pos);
            }
            (false, None) => {}
        }
    }

    /// Display names currently typing in a room, in insertion order.
    pub fn names(&self, room: &str) -> Vec<String> {
        self.rooms
            .get(room)
            .map(|entries| entries.iter().map(|(_, name)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether a connection is typing in a room.
    pub fn is_typing(&self, room: &str, id: ConnectionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|entries| entries.iter().any(|(entry_id, _)| *entry_id == id))
    }

    /// Purge a connection from every room's typing map.
    ///
    /// Returns the rooms where an entry was actually removed.
    pub fn remove_connection(&mut self, id: ConnectionId) -> Vec<String> {
        let mut affected = Vec::new();
        for (room, entries) in self.rooms.iter_mut() {
            if let Some(pos) = entries.iter().position(|(entry_id, _)| *entry_id == id) {
                entries.remove(pos);
                affected.push(room.clone());
            }
        }
        affected
    }
}
