//! Remote sync gateway
//!
//! The gateway is the only part of the crate that talks to the network. Each
//! method maps one controller intent onto one request/response exchange and
//! returns either the parsed value or an error; it keeps no state between
//! calls. Degradation policy (empty list, stale transcript, synthetic error
//! message) belongs to the session controller, not to the gateway.

pub mod http;

pub use http::HttpGateway;

use crate::error::Result;
use crate::session::{ChatSession, Message};
use async_trait::async_trait;

/// Client-side view of the remote chat service
///
/// Implementations must never be called with the embedded session's id; the
/// controller intercepts those intents before they reach the gateway.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// List every persisted session
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or the body is malformed
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Create a new, empty session
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or the body is malformed
    async fn create_session(&self) -> Result<ChatSession>;

    /// Fetch the full transcript of a session
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or the body is malformed
    async fn fetch_transcript(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Send one user turn and receive the assistant's reply
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session the turn belongs to
    /// * `text` - The user's message
    /// * `persona` - Persona id the reply should be written in
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or the body is malformed
    async fn send_message(&self, session_id: &str, text: &str, persona: &str) -> Result<Message>;

    /// Delete a session and its transcript
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SaarthiError::Remote`] carrying the service's
    /// message when the service refuses, or a gateway error otherwise
    async fn delete_session(&self, session_id: &str) -> Result<()>;
}
