//! The embedded memory session
//!
//! One session ships with the client: a short scripted exchange that points
//! the user back at a happy memory. It is always listed first, is never sent
//! to or fetched from the service, and cannot be written to or deleted.

use super::types::{Attachment, ChatSession, Message, MEMORY_LANE_LINK};
use crate::persona::EMPATHIZER;

/// Reserved id of the embedded session
///
/// Service ids are generated as `chat_<unix seconds>`, so this value cannot
/// collide with one.
pub const SPECIAL_SESSION_ID: &str = "special-chat-1";

const SPECIAL_SESSION_TITLE: &str = "A Happy Memory";

/// True when `id` is the reserved embedded-session id
pub fn is_special(id: &str) -> bool {
    id == SPECIAL_SESSION_ID
}

/// Metadata of the embedded session
///
/// The timestamp is the moment the metadata is built, so the session always
/// reads as recent.
pub fn special_session() -> ChatSession {
    ChatSession::new(
        SPECIAL_SESSION_ID,
        SPECIAL_SESSION_TITLE,
        EMPATHIZER.id,
        chrono::Utc::now().timestamp(),
    )
}

/// Fixed transcript of the embedded session
pub fn special_transcript() -> Vec<Message> {
    vec![
        Message::user("I'm feeling really down today."),
        Message::assistant(
            "I'm sorry to hear that. Sometimes looking back helps. Here is what made you happy last week, revisit those memories!",
            EMPATHIZER.id,
        )
        .with_attachment(Attachment {
            media_ref: "/chatbot_img/happy_memory.jpg".to_string(),
            link: Some(MEMORY_LANE_LINK.to_string()),
        }),
    ]
}
