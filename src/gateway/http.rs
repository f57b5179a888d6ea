//! HTTP implementation of the session gateway
//!
//! Talks JSON to the Saarthi backend:
//!
//! - `GET    {base}/api/chats`        list sessions
//! - `GET    {base}/api/chats/{id}`   fetch a transcript
//! - `POST   {base}/api/new_chat`     create a session
//! - `POST   {base}/api/chat`         send a turn, receive the reply
//! - `DELETE {base}/api/chats/{id}`   delete a session

use crate::config::ServerConfig;
use crate::error::{Result, SaarthiError};
use crate::gateway::SessionGateway;
use crate::session::{ChatSession, Message};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Gateway backed by the Saarthi HTTP API
///
/// # Examples
///
/// ```
/// use saarthi::config::ServerConfig;
/// use saarthi::gateway::HttpGateway;
///
/// let config = ServerConfig {
///     base_url: "http://127.0.0.1:5000".to_string(),
///     timeout_seconds: 30,
/// };
/// let gateway = HttpGateway::new(&config);
/// assert!(gateway.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

/// Request body for `POST /api/chat`
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a str,
    #[serde(rename = "chatId")]
    chat_id: &'a str,
    persona: &'a str,
}

/// Error body the backend returns alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpGateway {
    /// Create a gateway for the configured backend
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse or the HTTP client
    /// cannot be built
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            SaarthiError::Config(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(SaarthiError::Config(format!(
                "Base URL cannot carry paths: {}",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("saarthi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SaarthiError::Gateway(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized HTTP gateway: base={}", base);

        Ok(Self { client, base })
    }

    /// The backend origin this gateway talks to
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded individually, so a session id can never
    /// escape its path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turn a non-success response into an error, keeping the backend's
    /// message when it sent one
    async fn check_status(response: Response, intent: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::error!("{} returned error {}: {}", intent, status, text);

        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        match body.message.or(body.error) {
            Some(message) if !message.trim().is_empty() => Err(SaarthiError::Remote {
                status: status.as_u16(),
                message,
            }
            .into()),
            _ => Err(SaarthiError::Gateway(format!(
                "{} returned error {}: {}",
                intent, status, text
            ))
            .into()),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, intent: &str) -> Result<T> {
        let response = Self::check_status(response, intent).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", intent, e);
            SaarthiError::Gateway(format!("Failed to parse {} response: {}", intent, e)).into()
        })
    }

    fn transport_error(intent: &str, e: reqwest::Error) -> anyhow::Error {
        tracing::warn!("{} request failed: {}", intent, e);
        SaarthiError::Gateway(format!("{} request failed: {}", intent, e)).into()
    }
}

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let url = self.endpoint(&["api", "chats"]);
        tracing::debug!("Fetching sessions: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("List sessions", e))?;
        let sessions: Vec<ChatSession> = Self::read_json(response, "List sessions").await?;

        tracing::debug!("Fetched {} sessions", sessions.len());
        Ok(sessions)
    }

    async fn create_session(&self) -> Result<ChatSession> {
        let url = self.endpoint(&["api", "new_chat"]);
        tracing::debug!("Creating session: {}", url);

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("Create session", e))?;
        let session: ChatSession = Self::read_json(response, "Create session").await?;

        tracing::info!("Created session {}", session.id);
        Ok(session)
    }

    async fn fetch_transcript(&self, session_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoint(&["api", "chats", session_id]);
        tracing::debug!("Fetching transcript: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("Fetch transcript", e))?;
        let messages: Vec<Message> = Self::read_json(response, "Fetch transcript").await?;

        tracing::debug!("Fetched {} messages for {}", messages.len(), session_id);
        Ok(messages)
    }

    async fn send_message(&self, session_id: &str, text: &str, persona: &str) -> Result<Message> {
        let url = self.endpoint(&["api", "chat"]);
        let body = SendRequest {
            message: text,
            chat_id: session_id,
            persona,
        };
        tracing::debug!(
            "Sending message: session={}, persona={}, {} chars",
            session_id,
            persona,
            text.chars().count()
        );

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error("Send message", e))?;
        let reply: Message = Self::read_json(response, "Send message").await?;

        Ok(reply)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "chats", session_id]);
        tracing::debug!("Deleting session: {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("Delete session", e))?;
        Self::check_status(response, "Delete session").await?;

        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }
}
