//! Entities: chat messages and the bounded history.

use std::collections::VecDeque;

use super::{ClientId, MessageContent, Timestamp};

/// Number of messages kept in memory unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One accepted chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub client_id: ClientId,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(client_id: ClientId, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            client_id,
            content,
            timestamp,
        }
    }
}

/// Most recent messages in arrival order, oldest first.
///
/// Invariant: `len() <= capacity()` after every [`History::push`]. Eviction is
/// strict FIFO by count, never by age.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    messages: VecDeque<ChatMessage>,
}

impl History {
    /// Create an empty history holding at most `capacity` messages.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            messages: VecDeque::new(),
        }
    }

    /// Append a message, returning the evicted oldest entry when full
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            self.messages.pop_front()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Copy of the current contents, oldest first
    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
