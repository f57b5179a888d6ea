//! Session registry
//!
//! Holds the metadata of every known session in display order. The embedded
//! memory session always occupies the first position; the remaining entries
//! are the service's last listing, in the service's order. A failed listing
//! leaves no service entries.

use super::special::{is_special, special_session};
use super::types::ChatSession;

/// Ordered list of known sessions with the embedded session pinned first
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    special: ChatSession,
    remote: Vec<ChatSession>,
}

impl SessionRegistry {
    /// Creates a registry holding only the embedded session
    pub fn new() -> Self {
        Self {
            special: special_session(),
            remote: Vec::new(),
        }
    }

    /// All sessions, embedded session first
    pub fn list(&self) -> Vec<&ChatSession> {
        std::iter::once(&self.special)
            .chain(self.remote.iter())
            .collect()
    }

    /// Replaces every service-derived entry with `sessions`
    ///
    /// There is no merge: entries missing from `sessions` disappear. Entries
    /// carrying the reserved id are dropped so the embedded session stays
    /// unique.
    pub fn upsert_from_remote(&mut self, sessions: Vec<ChatSession>) {
        let before = sessions.len();
        self.remote = sessions.into_iter().filter(|s| !is_special(&s.id)).collect();
        if self.remote.len() != before {
            tracing::warn!(
                "Dropped {} service session(s) using the reserved id",
                before - self.remote.len()
            );
        }
        tracing::debug!("Registry refreshed: {} service sessions", self.remote.len());
    }

    /// Adds a session the service just created when the last listing
    /// did not include it
    pub fn keep_created(&mut self, session: ChatSession) {
        if is_special(&session.id) || self.remote.iter().any(|s| s.id == session.id) {
            return;
        }
        tracing::debug!("Listing missed created session {}, keeping it", session.id);
        self.remote.insert(0, session);
    }

    /// Finds a session by id, including the embedded session
    pub fn find(&self, id: &str) -> Option<&ChatSession> {
        if is_special(id) {
            return Some(&self.special);
        }
        self.remote.iter().find(|s| s.id == id)
    }

    /// The embedded session's metadata
    pub fn special(&self) -> &ChatSession {
        &self.special
    }

    /// First service-derived session, if any
    pub fn first_remote(&self) -> Option<&ChatSession> {
        self.remote.first()
    }

    /// Sessions whose title contains `query`, ignoring case
    ///
    /// An empty or whitespace-only query matches every session.
    pub fn search(&self, query: &str) -> Vec<&ChatSession> {
        let needle = query.trim().to_lowercase();
        self.list()
            .into_iter()
            .filter(|s| needle.is_empty() || s.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of sessions including the embedded session
    pub fn len(&self) -> usize {
        self.remote.len() + 1
    }

    /// Number of service-derived sessions
    pub fn remote_len(&self) -> usize {
        self.remote.len()
    }

    /// Never true; the embedded session is always present
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
