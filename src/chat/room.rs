//! Chat room: membership set plus bounded message log.

use std::collections::HashSet;

use super::connection::ConnectionId;
use super::log::MessageLog;

/// A named broadcast domain.
///
/// Rooms are created lazily on first reference and persist for the process
/// lifetime even when empty.
#[derive(Debug)]
pub struct Room {
    name: String,
    members: HashSet<ConnectionId>,
    log: MessageLog,
}

impl Room {
    /// Create an empty room retaining at most `history_limit` messages.
    pub fn new(name: impl Into<String>, history_limit: usize) -> Self {
        Self {
            name: name.into(),
            members: HashSet::new(),
            log: MessageLog::new(history_limit),
        }
    }

    /// The room name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member. Returns false if already present.
    pub fn add_member(&mut self, id: ConnectionId) -> bool {
        self.members.insert(id)
    }

    /// Remove a member. Returns false if not present.
    pub fn remove_member(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id)
    }

    /// Whether a connection is a member.
    pub fn is_member(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    /// The current membership set.
    pub fn members(&self) -> &HashSet<ConnectionId> {
        &self.members
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// The room's message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// The room's message log, mutable.
    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }
}
