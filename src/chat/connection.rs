//! Connection registry.
//!
//! Maps live connections to user identities and holds the per-connection
//! outbox used for broadcasts. A connection is attached when the socket
//! opens and carries no identity until a `user_join` event registers one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::ServerEvent;

/// Identity of a live connection, stable for the connection lifetime.
pub type ConnectionId = Uuid;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Connection id the user is bound to.
    pub id: ConnectionId,
    /// Display name, set once at join. Not validated; empty and duplicate
    /// names are permitted.
    pub username: String,
}

/// A live connection.
#[derive(Debug)]
pub struct Connection {
    outbox: mpsc::UnboundedSender<ServerEvent>,
    user: Option<User>,
    current_room: Option<String>,
}

impl Connection {
    fn new(outbox: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            outbox,
            user: None,
            current_room: None,
        }
    }
}

/// Registry of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new connection and return its id.
    pub fn attach(&mut self, outbox: mpsc::UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = Uuid::new_v4();
        self.connections.insert(id, Connection::new(outbox));
        id
    }

    /// Register a user identity on an attached connection.
    ///
    /// Returns the created user, or None if the connection is not attached.
    /// Registering again replaces the previous identity.
    pub fn register(&mut self, id: ConnectionId, username: impl Into<String>) -> Option<User> {
        let conn = self.connections.get_mut(&id)?;
        let user = User {
            id,
            username: username.into(),
        };
        conn.user = Some(user.clone());
        Some(user)
    }

    /// Look up the user registered on a connection.
    pub fn lookup(&self, id: ConnectionId) -> Option<&User> {
        self.connections.get(&id)?.user.as_ref()
    }

    /// Remove a connection entirely.
    ///
    /// This only releases the identity and outbox; room and typing state
    /// must be cleaned up by the caller.
    pub fn remove(&mut self, id: ConnectionId) {
        self.connections.remove(&id);
    }

    /// Whether a connection is currently attached.
    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// The connection's current room, if any.
    pub fn current_room(&self, id: ConnectionId) -> Option<&str> {
        self.connections.get(&id)?.current_room.as_deref()
    }

    /// Set or clear the connection's current room.
    pub fn set_current_room(&mut self, id: ConnectionId, room: Option<String>) {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.current_room = room;
        }
    }

    /// Deliver an event to a single connection, fire-and-forget.
    ///
    /// Unknown connections and closed outboxes are silently ignored.
    pub fn send(&self, id: ConnectionId, event: ServerEvent) {
        if let Some(conn) = self.connections.get(&id) {
            let _ = conn.outbox.send(event);
        }
    }

    /// All registered users, across all rooms.
    pub fn users(&self) -> Vec<User> {
        self.connections
            .values()
            .filter_map(|c| c.user.clone())
            .collect()
    }

    /// Number of attached connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether no connections are attached.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach(registry: &mut ConnectionRegistry) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (registry.attach(tx), rx)
    }

    #[test]
    fn test_attach_assigns_unique_ids() {
        let mut registry = ConnectionRegistry::new();
        let (a, _rx_a) = attach(&mut registry);
        let (b, _rx_b) = attach(&mut registry);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ConnectionRegistry::new();
        let (id, _rx) = attach(&mut registry);

        assert!(registry.lookup(id).is_none());

        let user = registry.register(id, "alice").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(registry.lookup(id).unwrap().username, "alice");
    }

    #[test]
    fn test_register_unknown_connection() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.register(Uuid::new_v4(), "ghost").is_none());
    }

    #[test]
    fn test_register_replaces_identity() {
        let mut registry = ConnectionRegistry::new();
        let (id, _rx) = attach(&mut registry);

        registry.register(id, "alice");
        registry.register(id, "alice2");
        assert_eq!(registry.lookup(id).unwrap().username, "alice2");
    }

    #[test]
    fn test_remove() {
        let mut registry = ConnectionRegistry::new();
        let (id, _rx) = attach(&mut registry);
        registry.register(id, "alice");

        registry.remove(id);
        assert!(!registry.is_attached(id));
        assert!(registry.lookup(id).is_none());

        // Removing again is a no-op
        registry.remove(id);
    }

    #[test]
    fn test_current_room() {
        let mut registry = ConnectionRegistry::new();
        let (id, _rx) = attach(&mut registry);

        assert!(registry.current_room(id).is_none());

        registry.set_current_room(id, Some("Tech".to_string()));
        assert_eq!(registry.current_room(id), Some("Tech"));

        registry.set_current_room(id, None);
        assert!(registry.current_room(id).is_none());
    }

    #[test]
    fn test_send_delivers_to_outbox() {
        let mut registry = ConnectionRegistry::new();
        let (id, mut rx) = attach(&mut registry);

        registry.send(id, ServerEvent::TypingUsers { users: vec![] });
        assert!(matches!(
            rx.try_recv().unwrap(),
            ServerEvent::TypingUsers { .. }
        ));
    }

    #[test]
    fn test_send_to_unknown_connection_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.send(Uuid::new_v4(), ServerEvent::TypingUsers { users: vec![] });
    }

    #[test]
    fn test_send_to_closed_outbox_is_noop() {
        let mut registry = ConnectionRegistry::new();
        let (id, rx) = attach(&mut registry);
        drop(rx);

        registry.send(id, ServerEvent::TypingUsers { users: vec![] });
    }

    #[test]
    fn test_users_lists_registered_only() {
        let mut registry = ConnectionRegistry::new();
        let (a, _rx_a) = attach(&mut registry);
        let (_b, _rx_b) = attach(&mut registry);

        registry.register(a, "alice");

        let users = registry.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }
}
