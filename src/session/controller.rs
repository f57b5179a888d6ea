//! Chat session controller
//!
//! The controller owns the session registry, the transcript of the active
//! session, the active-session pointer, the persona selector and the input
//! buffer. Its protocol methods are the only way to change any of them:
//!
//! - [`ChatSessionController::start`] lists sessions and activates one
//! - [`ChatSessionController::select_session`] switches the active session
//! - [`ChatSessionController::send_message`] appends a user turn and its reply
//! - [`ChatSessionController::new_chat`] creates and activates a session
//! - [`ChatSessionController::delete_session`] deletes and re-targets
//!
//! Network failures never leave the controller in an inconsistent state and
//! never change which session is active.
//!
//! # Late replies
//!
//! Every change of the active session bumps a generation counter. A send
//! captures the counter when it starts; its reply is written to the
//! transcript only if the counter is unchanged when the reply arrives. The
//! send is split into [`ChatSessionController::begin_send`] and
//! [`ChatSessionController::finish_send`] so a caller can run other protocols
//! while a reply is outstanding.

use std::fmt;
use std::sync::Arc;

use super::registry::SessionRegistry;
use super::special::{is_special, special_transcript, SPECIAL_SESSION_ID};
use super::transcript::TranscriptStore;
use super::types::{ChatSession, Message};
use crate::error::{Result, SaarthiError};
use crate::gateway::SessionGateway;
use crate::persona::{resolve_persona, Persona};

/// Text of the assistant message appended when a send fails
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Sorry, I couldn't connect. Please ensure the backend is running.";

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, `start` not called yet
    Uninitialized,
    /// Startup listing in progress
    Loading,
    /// A session is active
    Active(String),
}

/// Why a send was refused before touching the transcript or the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The text was empty or whitespace only
    EmptyInput,
    /// No session is active yet
    NoActiveSession,
    /// The active session is the read-only memory session
    ReadOnlySession,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "nothing to send"),
            Self::NoActiveSession => write!(f, "no active session"),
            Self::ReadOnlySession => write!(f, "this session is read-only"),
        }
    }
}

/// Result of a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Guarded no-op; nothing changed
    Ignored(IgnoreReason),
    /// The reply was appended to the transcript
    Replied(Message),
    /// The service could not be reached; the synthetic error message was appended
    Failed(String),
    /// The active session changed while the reply was in flight; nothing was
    /// appended
    Discarded,
}

/// A send whose local half has run and whose reply is outstanding
#[derive(Debug, Clone)]
pub struct PendingSend {
    session_id: String,
    text: String,
    persona: String,
    generation: u64,
}

impl PendingSend {
    /// Session the message was sent in
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Text the user sent
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Persona selected when the message was sent
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Issue the network half of the send
    ///
    /// # Errors
    ///
    /// Returns the gateway's error unchanged
    pub async fn dispatch(&self, gateway: &dyn SessionGateway) -> Result<Message> {
        gateway
            .send_message(&self.session_id, &self.text, &self.persona)
            .await
    }
}

/// Orchestrates sessions, transcript and gateway
pub struct ChatSessionController {
    gateway: Arc<dyn SessionGateway>,
    registry: SessionRegistry,
    transcript: TranscriptStore,
    lifecycle: Lifecycle,
    generation: u64,
    persona: String,
    input: String,
    in_flight: usize,
}

impl ChatSessionController {
    /// Creates an uninitialized controller
    ///
    /// # Arguments
    ///
    /// * `gateway` - Remote service access
    /// * `default_persona` - Persona selected until a session is activated
    pub fn new(gateway: Arc<dyn SessionGateway>, default_persona: &str) -> Self {
        Self {
            gateway,
            registry: SessionRegistry::new(),
            transcript: TranscriptStore::new(),
            lifecycle: Lifecycle::Uninitialized,
            generation: 0,
            persona: resolve_persona(default_persona).id.to_string(),
            input: String::new(),
            in_flight: 0,
        }
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Id of the active session
    pub fn active_session_id(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Active(id) => Some(id),
            _ => None,
        }
    }

    /// Metadata of the active session, if the registry knows it
    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_session_id().and_then(|id| self.registry.find(id))
    }

    /// True when the memory session is active
    pub fn is_read_only(&self) -> bool {
        self.active_session_id().map(is_special).unwrap_or(false)
    }

    /// Known sessions
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Messages of the active session
    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Persona id currently selected
    pub fn persona_id(&self) -> &str {
        &self.persona
    }

    /// Persona currently selected, resolved
    pub fn persona(&self) -> Persona {
        resolve_persona(&self.persona)
    }

    /// Contents of the input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a begun send has not finished
    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight > 0
    }

    /// Shared handle to the gateway, for dispatching a [`PendingSend`]
    pub fn gateway(&self) -> Arc<dyn SessionGateway> {
        Arc::clone(&self.gateway)
    }

    /// Replace the input buffer
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Choose the persona for the next message
    ///
    /// Unknown ids select the default persona. History is not relabeled.
    pub fn select_persona(&mut self, id: &str) -> Persona {
        let persona = resolve_persona(id);
        if persona.id != id {
            tracing::warn!("Unknown persona '{}', using {}", id, persona.id);
        }
        self.persona = persona.id.to_string();
        persona
    }

    /// Startup protocol
    ///
    /// Lists sessions, then activates the first service session. A listing
    /// that succeeds with no service sessions means first-ever use, so a new
    /// session is created. A failed listing activates the memory session and
    /// creates nothing. If the create fails the memory session is activated
    /// as well, so that a session is always active.
    ///
    /// # Errors
    ///
    /// Returns the listing or create error when the memory-session fallback
    /// was taken
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("Starting chat session controller");
        self.lifecycle = Lifecycle::Loading;
        if let Err(e) = self.load_sessions().await {
            tracing::warn!("Failed to list sessions at startup, showing the memory session");
            self.select_session(SPECIAL_SESSION_ID).await?;
            return Err(e);
        }
        self.activate_first_or_create().await
    }

    /// Refresh the registry from the service
    ///
    /// A failed listing degrades to an empty list; the memory session is
    /// still present afterwards. Returns the number of service sessions.
    pub async fn refresh_sessions(&mut self) -> usize {
        if let Err(e) = self.load_sessions().await {
            tracing::warn!("Failed to list sessions: {}", e);
        }
        self.registry.remote_len()
    }

    /// Selection protocol
    ///
    /// Makes `id` active, selects its last persona and loads its transcript.
    /// Selecting the active session again re-fetches its transcript. A failed
    /// fetch keeps whatever transcript was loaded before.
    ///
    /// # Errors
    ///
    /// Returns [`SaarthiError::UnknownSession`] if `id` is not in the registry
    pub async fn select_session(&mut self, id: &str) -> Result<()> {
        let session = self
            .registry
            .find(id)
            .cloned()
            .ok_or_else(|| SaarthiError::UnknownSession(id.to_string()))?;

        tracing::debug!("Selecting session {}", session.id);
        self.activate(&session.id);
        self.persona = session.last_persona.clone();

        if is_special(&session.id) {
            self.transcript.replace(special_transcript());
            return Ok(());
        }

        match self.gateway.fetch_transcript(&session.id).await {
            Ok(messages) => self.transcript.replace(messages),
            Err(e) => tracing::warn!(
                "Failed to fetch transcript for {}, keeping current transcript: {}",
                session.id,
                e
            ),
        }
        Ok(())
    }

    /// Local half of the send protocol
    ///
    /// Appends the user's message, clears the input buffer and captures the
    /// current generation.
    ///
    /// Every [`PendingSend`] must be handed back to
    /// [`ChatSessionController::finish_send`], even when its dispatch was
    /// abandoned. Until then [`ChatSessionController::is_awaiting_reply`]
    /// stays true.
    ///
    /// # Errors
    ///
    /// Returns the reason the send was refused; nothing changes in that case
    pub fn begin_send(&mut self, text: &str) -> std::result::Result<PendingSend, IgnoreReason> {
        if text.trim().is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }
        let session_id = match self.active_session_id() {
            Some(id) => id.to_string(),
            None => return Err(IgnoreReason::NoActiveSession),
        };
        if is_special(&session_id) {
            return Err(IgnoreReason::ReadOnlySession);
        }

        self.transcript.append(Message::user(text));
        self.input.clear();
        self.in_flight += 1;

        Ok(PendingSend {
            session_id,
            text: text.to_string(),
            persona: self.persona.clone(),
            generation: self.generation,
        })
    }

    /// Completion half of the send protocol
    ///
    /// Appends the reply, or the connection-error message on failure, as
    /// long as the session the send started in is still the active one. A
    /// successful reply refreshes the registry either way, since the service
    /// may have retitled the session.
    pub async fn finish_send(
        &mut self,
        pending: PendingSend,
        result: Result<Message>,
    ) -> SendOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let current = pending.generation == self.generation;

        match result {
            Ok(reply) => {
                let outcome = if current {
                    self.transcript.append(reply.clone());
                    SendOutcome::Replied(reply)
                } else {
                    tracing::debug!(
                        "Discarding reply for {}: active session changed",
                        pending.session_id
                    );
                    SendOutcome::Discarded
                };
                self.refresh_sessions().await;
                outcome
            }
            Err(e) => {
                tracing::warn!("Failed to send message in {}: {}", pending.session_id, e);
                if !current {
                    return SendOutcome::Discarded;
                }
                self.transcript.append(Message::assistant(
                    CONNECTION_ERROR_MESSAGE,
                    pending.persona,
                ));
                SendOutcome::Failed(e.to_string())
            }
        }
    }

    /// Send protocol
    ///
    /// Guarded no-op for empty text, no active session, or the memory
    /// session. Otherwise the user's message is appended immediately and the
    /// reply (or a connection-error message) follows it. There is no retry.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let pending = match self.begin_send(text) {
            Ok(pending) => pending,
            Err(reason) => {
                tracing::debug!("Send ignored: {}", reason);
                return SendOutcome::Ignored(reason);
            }
        };
        let gateway = self.gateway();
        let result = pending.dispatch(gateway.as_ref()).await;
        self.finish_send(pending, result).await
    }

    /// Create protocol
    ///
    /// On success the transcript is cleared, the new session becomes active
    /// and the registry is refreshed. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error if the session could not be created
    pub async fn new_chat(&mut self) -> Result<ChatSession> {
        let session = self.gateway.create_session().await.map_err(|e| {
            tracing::error!("Failed to create session: {}", e);
            e
        })?;

        self.transcript.clear();
        self.activate(&session.id);
        self.refresh_sessions().await;
        self.registry.keep_created(session.clone());
        Ok(session)
    }

    /// Delete protocol
    ///
    /// The memory session cannot be deleted. After a successful delete the
    /// registry is refreshed; if the deleted session was active, the first
    /// service session is activated, or a new one is created, or as a last
    /// resort the memory session is activated.
    ///
    /// # Errors
    ///
    /// Returns [`SaarthiError::SpecialSessionReadOnly`] for the memory
    /// session, or the gateway's error (carrying the service's message) if
    /// the delete failed. Nothing changes in either case.
    pub async fn delete_session(&mut self, id: &str) -> Result<()> {
        if is_special(id) {
            return Err(SaarthiError::SpecialSessionReadOnly(id.to_string()).into());
        }

        self.gateway.delete_session(id).await.map_err(|e| {
            tracing::error!("Failed to delete session {}: {}", id, e);
            e
        })?;

        let was_active = self.active_session_id() == Some(id);
        self.refresh_sessions().await;

        if was_active {
            if let Err(e) = self.activate_first_or_create().await {
                tracing::warn!("No replacement session after delete: {}", e);
            }
        }
        Ok(())
    }

    /// Replace the registry with the service's listing; a failure leaves
    /// only the memory session
    async fn load_sessions(&mut self) -> Result<()> {
        match self.gateway.list_sessions().await {
            Ok(sessions) => {
                self.registry.upsert_from_remote(sessions);
                Ok(())
            }
            Err(e) => {
                self.registry.upsert_from_remote(Vec::new());
                Err(e)
            }
        }
    }

    async fn activate_first_or_create(&mut self) -> Result<()> {
        if let Some(first) = self.registry.first_remote().map(|s| s.id.clone()) {
            return self.select_session(&first).await;
        }

        match self.new_chat().await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.select_session(SPECIAL_SESSION_ID).await?;
                Err(e)
            }
        }
    }

    fn activate(&mut self, id: &str) {
        self.generation = self.generation.wrapping_add(1);
        self.lifecycle = Lifecycle::Active(id.to_string());
    }
}
