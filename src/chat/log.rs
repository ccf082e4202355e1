//! Bounded per-room message log.
//!
//! The log is append-only and keeps at most a fixed number of messages,
//! evicting the oldest first. Bounding the log keeps memory flat in
//! long-lived rooms. Pagination walks backwards from a timestamp cursor but
//! returns each page in ascending order so callers can prepend it to a
//! transcript without re-sorting.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::message::{ChatMessage, MessageId};

/// Bounded, append-only ordered sequence of messages.
#[derive(Debug)]
pub struct MessageLog {
    messages: VecDeque<ChatMessage>,
    limit: usize,
}

impl MessageLog {
    /// Create an empty log retaining at most `limit` messages.
    pub fn new(limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            limit,
        }
    }

    /// Append a message, evicting from the head while over the limit.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.limit {
            self.messages.pop_front();
        }
    }

    /// Find a message by id.
    pub fn find(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Find a message by id for in-place mutation.
    pub fn find_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Page backwards through the log.
    ///
    /// Considers only messages with a timestamp strictly earlier than
    /// `before` (all messages if None) and returns the most recent `limit`
    /// of them in ascending order. A result shorter than `limit` means no
    /// earlier messages exist.
    pub fn page(&self, limit: usize, before: Option<DateTime<Utc>>) -> Vec<ChatMessage> {
        let filtered: Vec<&ChatMessage> = self
            .messages
            .iter()
            .filter(|m| before.map_or(true, |cursor| m.timestamp < cursor))
            .collect();
        let skip = filtered.len().saturating_sub(limit);
        filtered[skip..].iter().map(|m| (*m).clone()).collect()
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
