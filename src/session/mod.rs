//! Chat sessions
//!
//! Data types, the session registry, the active transcript, the embedded
//! memory session, and the controller that ties them to the gateway.

pub mod controller;
pub mod registry;
pub mod special;
pub mod transcript;
pub mod types;

pub use controller::{
    ChatSessionController, IgnoreReason, Lifecycle, PendingSend, SendOutcome,
    CONNECTION_ERROR_MESSAGE,
};
pub use registry::SessionRegistry;
pub use special::{is_special, special_session, special_transcript, SPECIAL_SESSION_ID};
pub use transcript::TranscriptStore;
pub use types::{Attachment, ChatSession, Message, Role, MEMORY_LANE_LINK};
