//! Test utilities for Saarthi
//!
//! Provides an in-memory [`SessionGateway`] that behaves like a small
//! backend, records every call it receives, and can be told to fail.

use crate::error::{Result, SaarthiError};
use crate::gateway::SessionGateway;
use crate::session::{ChatSession, Message, Role};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One call received by [`FakeGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Create,
    Fetch(String),
    Send {
        session_id: String,
        text: String,
        persona: String,
    },
    Delete(String),
}

#[derive(Default)]
struct FakeState {
    sessions: Vec<ChatSession>,
    transcripts: HashMap<String, Vec<Message>>,
    calls: Vec<GatewayCall>,
    next_id: u64,
    fail_list: bool,
    fail_create: bool,
    fail_fetch: bool,
    fail_send: bool,
    delete_error: Option<String>,
}

/// In-memory stand-in for the chat service
///
/// Replies echo the user's text in the requested persona. A session titled
/// "New Chat" takes its first message as its title.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session to the service's listing
    pub fn add_session(&self, session: ChatSession) {
        let mut state = self.state.lock().unwrap();
        state.transcripts.entry(session.id.clone()).or_default();
        state.sessions.push(session);
    }

    pub fn set_transcript(&self, id: &str, messages: Vec<Message>) {
        self.state
            .lock()
            .unwrap()
            .transcripts
            .insert(id.to_string(), messages);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetch = fail;
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.state.lock().unwrap().fail_send = fail;
    }

    /// Make deletes fail with the given service message
    pub fn set_delete_error(&self, message: Option<&str>) {
        self.state.lock().unwrap().delete_error = message.map(str::to_string);
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn offline(intent: &str) -> anyhow::Error {
        SaarthiError::Gateway(format!("{} request failed: connection refused", intent)).into()
    }
}

#[async_trait]
impl SessionGateway for FakeGateway {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::List);
        if state.fail_list {
            return Err(Self::offline("List sessions"));
        }
        Ok(state.sessions.clone())
    }

    async fn create_session(&self) -> Result<ChatSession> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Create);
        if state.fail_create {
            return Err(Self::offline("Create session"));
        }
        state.next_id += 1;
        let session = ChatSession::new(
            format!("chat_{}", state.next_id),
            "New Chat",
            "empathizer",
            1_700_000_000 + state.next_id as i64,
        );
        state.transcripts.insert(session.id.clone(), Vec::new());
        state.sessions.insert(0, session.clone());
        Ok(session)
    }

    async fn fetch_transcript(&self, session_id: &str) -> Result<Vec<Message>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Fetch(session_id.to_string()));
        if state.fail_fetch {
            return Err(Self::offline("Fetch transcript"));
        }
        state
            .transcripts
            .get(session_id)
            .cloned()
            .ok_or_else(|| SaarthiError::Remote {
                status: 404,
                message: "Chat not found".to_string(),
            }
            .into())
    }

    async fn send_message(&self, session_id: &str, text: &str, persona: &str) -> Result<Message> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Send {
            session_id: session_id.to_string(),
            text: text.to_string(),
            persona: persona.to_string(),
        });
        if state.fail_send {
            return Err(Self::offline("Send message"));
        }

        let reply = Message::assistant(format!("echo: {}", text), persona);
        let transcript = state.transcripts.entry(session_id.to_string()).or_default();
        let first_turn = !transcript.iter().any(|m| m.role == Role::User);
        transcript.push(Message::user(text));
        transcript.push(reply.clone());

        if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
            if first_turn && session.title == "New Chat" {
                session.title = text.to_string();
            }
            session.last_persona = persona.to_string();
        }
        Ok(reply)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Delete(session_id.to_string()));
        if let Some(message) = state.delete_error.clone() {
            return Err(SaarthiError::Remote {
                status: 500,
                message,
            }
            .into());
        }
        state.sessions.retain(|s| s.id != session_id);
        state.transcripts.remove(session_id);
        Ok(())
    }
}
