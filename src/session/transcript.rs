//! Transcript store
//!
//! Holds the messages of the active session and nothing else. Contents are
//! replaced wholesale when the active session changes and only ever grow at
//! the end otherwise.

use super::types::Message;

/// Ordered messages of the active session
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    messages: Vec<Message>,
}

impl TranscriptStore {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the transcript
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Adds a message at the end; no reordering, no deduplication
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when the transcript holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
