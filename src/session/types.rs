//! Session and message types
//!
//! These are the client-side shapes of the service's chat metadata and chat
//! messages. The serde attributes follow the service's JSON field names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::persona::DEFAULT_PERSONA;

/// Deep-navigation target used when a message carries media without a link
pub const MEMORY_LANE_LINK: &str = "/memory-lane";

/// Metadata for one conversation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Opaque identifier assigned by the service
    pub id: String,
    /// Human-readable label; may be empty
    #[serde(default)]
    pub title: String,
    /// Persona most recently used in this session
    #[serde(default = "default_last_persona")]
    pub last_persona: String,
    /// Last activity in Unix seconds
    #[serde(default)]
    pub timestamp: i64,
}

fn default_last_persona() -> String {
    DEFAULT_PERSONA.id.to_string()
}

impl ChatSession {
    /// Create session metadata
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        last_persona: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            last_persona: last_persona.into(),
            timestamp,
        }
    }

    /// Title for display, substituting a placeholder for empty titles
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled chat"
        } else {
            &self.title
        }
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person using the client
    User,
    /// Produced by the assistant service (or synthesized locally on failure)
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Media shown alongside a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Media resource reference
    pub media_ref: String,
    /// Optional deep-navigation target
    pub link: Option<String>,
}

/// One message in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireMessage", into = "WireMessage")]
pub struct Message {
    /// Who wrote the message
    pub role: Role,
    /// Plain-text body
    pub content: String,
    /// Persona id for assistant messages
    pub persona: Option<String>,
    /// Optional media attachment
    pub attachment: Option<Attachment>,
}

impl Message {
    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use saarthi::session::{Message, Role};
    ///
    /// let msg = Message::user("I'm feeling really down today.");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.persona.is_none());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            persona: None,
            attachment: None,
        }
    }

    /// Creates an assistant message tagged with a persona
    pub fn assistant(content: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            persona: Some(persona.into()),
            attachment: None,
        }
    }

    /// Attach media to this message
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// JSON shape used by the service
///
/// The service sends a flat `imageUrl` field; the link is optional and
/// defaults to the memory lane page when media is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: Role,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    persona: Option<String>,
    #[serde(
        default,
        rename = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        let attachment = wire.image_url.map(|media_ref| Attachment {
            media_ref,
            link: Some(wire.link.unwrap_or_else(|| MEMORY_LANE_LINK.to_string())),
        });
        Self {
            role: wire.role,
            content: wire.content,
            persona: wire.persona,
            attachment,
        }
    }
}

impl From<Message> for WireMessage {
    fn from(msg: Message) -> Self {
        let (image_url, link) = match msg.attachment {
            Some(a) => (Some(a.media_ref), a.link),
            None => (None, None),
        };
        Self {
            role: msg.role,
            content: msg.content,
            persona: msg.persona,
            image_url,
            link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_service_json() {
        let json = r#"{"id":"chat_1700000000","title":"New Chat","timestamp":1700000000,"last_persona":"motivator"}"#;
        let session: ChatSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "chat_1700000000");
        assert_eq!(session.title, "New Chat");
        assert_eq!(session.last_persona, "motivator");
        assert_eq!(session.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_session_missing_fields_use_defaults() {
        let session: ChatSession = serde_json::from_str(r#"{"id":"chat_2"}"#).unwrap();
        assert_eq!(session.title, "");
        assert_eq!(session.last_persona, "empathizer");
        assert_eq!(session.timestamp, 0);
        assert_eq!(session.display_title(), "Untitled chat");
    }

    #[test]
    fn test_session_without_id_is_rejected() {
        assert!(serde_json::from_str::<ChatSession>(r#"{"title":"x"}"#).is_err());
    }

    #[test]
    fn test_user_message_from_service_json() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"user","content":"hello"}"#).unwrap();
        assert_eq!(msg, Message::user("hello"));
    }

    #[test]
    fn test_assistant_message_with_image_gets_default_link() {
        let json = r#"{"role":"assistant","content":"look","persona":"empathizer","imageUrl":"/chatbot_img/happy_memory.jpg"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        let attachment = msg.attachment.unwrap();
        assert_eq!(attachment.media_ref, "/chatbot_img/happy_memory.jpg");
        assert_eq!(attachment.link.as_deref(), Some(MEMORY_LANE_LINK));
    }

    #[test]
    fn test_explicit_link_is_kept() {
        let json = r#"{"role":"assistant","content":"x","imageUrl":"/a.jpg","link":"/gallery"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.attachment.unwrap().link.as_deref(), Some("/gallery"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Message>(r#"{"role":"system","content":"x"}"#).is_err());
    }

    #[test]
    fn test_user_message_serializes_without_optional_fields() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
