//! The chat engine.
//!
//! An explicit state container owning the connection registry, the room
//! table, and the typing tracker. Inbound events are dispatched through
//! [`ChatEngine::handle`]; every operation completes its whole
//! read-modify-broadcast sequence before returning, so wrapping the engine
//! in a single async mutex preserves per-event atomicity. Broadcast payloads
//! are owned snapshots cloned per recipient; later mutation of engine state
//! is never observable through an already-emitted event.
//!
//! Unknown connections, rooms, and message ids are silent no-ops. Rooms are
//! created on any reference and never destroyed; an empty room keeps its
//! entry for the process lifetime.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ChatConfig;

use super::connection::{ConnectionId, ConnectionRegistry, User};
use super::events::{ClientEvent, ServerEvent};
use super::message::{ChatMessage, MessageId, PrivateMessage};
use super::room::Room;
use super::typing::TypingTracker;
use super::DEFAULT_ROOM;

/// Display name used when a connection sends without identifying itself.
const ANONYMOUS: &str = "Anonymous";

/// Server-side chat state and event dispatch.
pub struct ChatEngine {
    connections: ConnectionRegistry,
    rooms: BTreeMap<String, Room>,
    typing: TypingTracker,
    next_message_id: MessageId,
    history_limit: usize,
    default_limit: usize,
}

impl ChatEngine {
    /// Create an engine with the configured default rooms.
    pub fn new(config: &ChatConfig) -> Self {
        let mut engine = Self {
            connections: ConnectionRegistry::new(),
            rooms: BTreeMap::new(),
            typing: TypingTracker::new(),
            next_message_id: 1,
            history_limit: config.history_limit,
            default_limit: config.default_limit,
        };
        for room in &config.default_rooms {
            engine.ensure_room(room);
        }
        engine
    }

    /// Attach a new connection with its outbox and return its id.
    pub fn attach(&mut self, outbox: mpsc::UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = self.connections.attach(outbox);
        debug!(connection = %id, "connection attached");
        id
    }

    /// Dispatch an inbound event to the matching operation.
    pub fn handle(&mut self, conn: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::UserJoin { username, room } => self.user_join(conn, username, room),
            ClientEvent::JoinRoom { room } => self.join_room(conn, room),
            ClientEvent::LeaveRoom { room } => self.leave_room(conn, room),
            ClientEvent::SendMessage { message, room } => self.send_message(conn, message, room),
            ClientEvent::Typing { is_typing } => self.set_typing(conn, is_typing),
            ClientEvent::PrivateMessage { to, message } => self.private_message(conn, to, message),
            ClientEvent::MessageRead { message_id, room } => {
                self.message_read(conn, message_id, room)
            }
            ClientEvent::ReactMessage {
                message_id,
                room,
                reaction,
            } => self.react_message(conn, message_id, room, reaction),
        }
    }

    /// Identify a connection and join its first room.
    pub fn user_join(
        &mut self,
        conn: ConnectionId,
        username: impl Into<String>,
        room: impl Into<String>,
    ) {
        let room = room.into();
        let Some(user) = self.connections.register(conn, username) else {
            return;
        };
        self.ensure_room(&room).add_member(conn);
        self.connections.set_current_room(conn, Some(room.clone()));
        self.broadcast_room(
            &room,
            ServerEvent::UserList {
                users: self.member_list(&room),
            },
        );
        self.broadcast_room(
            &room,
            ServerEvent::UserJoined {
                username: user.username.clone(),
                id: conn,
                room: room.clone(),
            },
        );
        info!(username = %user.username, room = %room, "user joined the chat");
    }

    /// Switch a connection to a different room.
    ///
    /// Leaving the previous room and joining the new one happen inside this
    /// single operation, so no other event can observe membership in both.
    /// Joining the current room again is permitted and re-emits membership.
    pub fn join_room(&mut self, conn: ConnectionId, room: impl Into<String>) {
        let room = room.into();
        let Some(user) = self.connections.lookup(conn).cloned() else {
            return;
        };

        if let Some(previous) = self.connections.current_room(conn).map(str::to_owned) {
            if let Some(tracked) = self.rooms.get_mut(&previous) {
                tracked.remove_member(conn);
                self.broadcast_room(
                    &previous,
                    ServerEvent::UserLeft {
                        username: user.username.clone(),
                        id: conn,
                        room: previous.clone(),
                    },
                );
                self.broadcast_room(
                    &previous,
                    ServerEvent::UserList {
                        users: self.member_list(&previous),
                    },
                );
            }
        }

        self.ensure_room(&room).add_member(conn);
        self.connections.set_current_room(conn, Some(room.clone()));
        self.broadcast_room(
            &room,
            ServerEvent::UserJoined {
                username: user.username,
                id: conn,
                room: room.clone(),
            },
        );
        self.broadcast_room(
            &room,
            ServerEvent::UserList {
                users: self.member_list(&room),
            },
        );
    }

    /// Remove a connection from a room.
    ///
    /// Unknown rooms are ignored; leave never creates a room.
    pub fn leave_room(&mut self, conn: ConnectionId, room: impl Into<String>) {
        let room = room.into();
        let Some(user) = self.connections.lookup(conn).cloned() else {
            return;
        };
        let Some(tracked) = self.rooms.get_mut(&room) else {
            return;
        };
        tracked.remove_member(conn);
        self.broadcast_room(
            &room,
            ServerEvent::UserLeft {
                username: user.username,
                id: conn,
                room: room.clone(),
            },
        );
        self.broadcast_room(
            &room,
            ServerEvent::UserList {
                users: self.member_list(&room),
            },
        );
        if self.connections.current_room(conn) == Some(room.as_str()) {
            self.connections.set_current_room(conn, None);
        }
    }

    /// Append a message to a room's log, fan it out, and acknowledge.
    ///
    /// The room falls back to the connection's current room, then to
    /// "General". An unidentified sender is named "Anonymous".
    pub fn send_message(
        &mut self,
        conn: ConnectionId,
        content: impl Into<String>,
        room: Option<String>,
    ) {
        let room = room
            .or_else(|| self.connections.current_room(conn).map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_ROOM.to_string());
        let sender = self
            .connections
            .lookup(conn)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let id = self.alloc_message_id();
        let message = ChatMessage::new(id, sender, conn, room.clone(), content);
        self.ensure_room(&room).log_mut().append(message.clone());
        self.broadcast_room(&room, ServerEvent::ReceiveMessage { message });
        self.connections.send(
            conn,
            ServerEvent::MessageDelivered {
                message_id: id,
                room,
            },
        );
    }

    /// Update the typing map of the connection's current room.
    ///
    /// The event carries no room; the current room is used, defaulting to
    /// "General". Connections without a username are ignored. The full
    /// typing list is re-emitted on every change.
    pub fn set_typing(&mut self, conn: ConnectionId, is_typing: bool) {
        let Some(user) = self.connections.lookup(conn).cloned() else {
            return;
        };
        let room = self
            .connections
            .current_room(conn)
            .map(str::to_owned)
            .unwrap_or_else(|| DEFAULT_ROOM.to_string());
        self.ensure_room(&room);
        self.typing.set(room.as_str(), conn, user.username, is_typing);
        self.broadcast_room(
            &room,
            ServerEvent::TypingUsers {
                users: self.typing.names(&room),
            },
        );
    }

    /// Deliver a private message to a target connection and echo it back.
    ///
    /// Not stored anywhere; a detached target simply does not receive it.
    pub fn private_message(
        &mut self,
        conn: ConnectionId,
        to: ConnectionId,
        content: impl Into<String>,
    ) {
        let sender = self
            .connections
            .lookup(conn)
            .map(|u| u.username.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let id = self.alloc_message_id();
        let message = PrivateMessage::new(id, sender, conn, content);
        if to != conn {
            self.connections.send(
                to,
                ServerEvent::PrivateMessage {
                    message: message.clone(),
                },
            );
        }
        self.connections
            .send(conn, ServerEvent::PrivateMessage { message });
    }

    /// Record a read receipt on a message.
    ///
    /// First read by a user notifies the original sender (if still
    /// connected) and broadcasts the updated receipt set to the room.
    /// Repeat reads and unknown message ids do nothing.
    pub fn message_read(
        &mut self,
        conn: ConnectionId,
        message_id: MessageId,
        room: impl Into<String>,
    ) {
        let room = room.into();
        self.ensure_room(&room);
        let Some(user) = self.connections.lookup(conn).cloned() else {
            return;
        };
        let Some(message) = self
            .rooms
            .get_mut(&room)
            .and_then(|r| r.log_mut().find_mut(message_id))
        else {
            return;
        };
        if !message.mark_read(user.id) {
            return;
        }
        let read_by = message.read_by.clone();
        let sender_id = message.sender_id;

        if self.connections.is_attached(sender_id) {
            self.connections.send(
                sender_id,
                ServerEvent::MessageRead {
                    message_id,
                    reader: user,
                },
            );
        }
        self.broadcast_room(
            &room,
            ServerEvent::MessageReadUpdate {
                message_id,
                read_by,
            },
        );
    }

    /// Toggle a reaction on a message and republish its reaction map.
    ///
    /// Symbols are not validated; any string toggles. Unknown message ids
    /// and unidentified connections do nothing.
    pub fn react_message(
        &mut self,
        conn: ConnectionId,
        message_id: MessageId,
        room: impl Into<String>,
        reaction: impl Into<String>,
    ) {
        let room = room.into();
        self.ensure_room(&room);
        if self.connections.lookup(conn).is_none() {
            return;
        }
        let Some(message) = self
            .rooms
            .get_mut(&room)
            .and_then(|r| r.log_mut().find_mut(message_id))
        else {
            return;
        };
        message.toggle_reaction(reaction, conn);
        let reactions = message.reactions.clone();

        self.broadcast_room(
            &room,
            ServerEvent::MessageReactionUpdate {
                message_id,
                reactions,
            },
        );
    }

    /// Tear down a connection.
    ///
    /// Synchronously purges it from every room's membership and typing map,
    /// broadcasting refreshed member and typing lists to the affected rooms,
    /// before the identity is released.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        if let Some(user) = self.connections.lookup(conn).cloned() {
            let member_of: Vec<String> = self
                .rooms
                .iter()
                .filter(|(_, room)| room.is_member(conn))
                .map(|(name, _)| name.clone())
                .collect();
            for room in member_of {
                if let Some(tracked) = self.rooms.get_mut(&room) {
                    tracked.remove_member(conn);
                }
                self.broadcast_room(
                    &room,
                    ServerEvent::UserLeft {
                        username: user.username.clone(),
                        id: conn,
                        room: room.clone(),
                    },
                );
                self.broadcast_room(
                    &room,
                    ServerEvent::UserList {
                        users: self.member_list(&room),
                    },
                );
            }
            for room in self.typing.remove_connection(conn) {
                self.broadcast_room(
                    &room,
                    ServerEvent::TypingUsers {
                        users: self.typing.names(&room),
                    },
                );
            }
            info!(username = %user.username, "user left the chat");
        }
        self.connections.remove(conn);
        debug!(connection = %conn, "connection released");
    }

    /// All room names, sorted.
    pub fn room_names(&self) -> Vec<String> {
        self.rooms.keys().cloned().collect()
    }

    /// All registered users across all rooms.
    pub fn users(&self) -> Vec<User> {
        self.connections.users()
    }

    /// Page backwards through a room's message log.
    ///
    /// Creates the room if absent. `limit` defaults to the configured page
    /// size; `before` restricts the page to strictly earlier messages.
    pub fn page_messages(
        &mut self,
        room: &str,
        limit: Option<usize>,
        before: Option<DateTime<Utc>>,
    ) -> Vec<ChatMessage> {
        let limit = limit.unwrap_or(self.default_limit);
        self.ensure_room(room).log().page(limit, before)
    }

    /// Get or create a room.
    fn ensure_room(&mut self, name: &str) -> &mut Room {
        let history_limit = self.history_limit;
        self.rooms.entry(name.to_string()).or_insert_with(|| {
            debug!(room = name, "creating room");
            Room::new(name, history_limit)
        })
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }

    /// Membership snapshot of a room, mapped to registered users.
    fn member_list(&self, room: &str) -> Vec<User> {
        self.rooms
            .get(room)
            .map(|room| {
                room.members()
                    .iter()
                    .filter_map(|&id| self.connections.lookup(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Clone an event into every member's outbox, fire-and-forget.
    fn broadcast_room(&self, room: &str, event: ServerEvent) {
        if let Some(room) = self.rooms.get(room) {
            for &member in room.members() {
                self.connections.send(member, event.clone());
            }
        }
    }
}
