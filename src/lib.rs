//! Saarthi - terminal client library for the Saarthi wellness companion
//!
//! This library provides the chat session controller, the remote session
//! gateway, persona definitions, configuration, and the vent room.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session registry, transcript store, embedded memory session, and controller
//! - `gateway`: Remote sync gateway trait and its HTTP implementation
//! - `persona`: The three assistant personas
//! - `vent`: Vent room state machine
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Command handlers used by the binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use saarthi::{ChatSessionController, Config, HttpGateway};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let gateway = Arc::new(HttpGateway::new(&config.server)?);
//!     let mut controller = ChatSessionController::new(gateway, &config.chat.default_persona);
//!     controller.start().await?;
//!     controller.send_message("I had a rough day").await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod persona;
pub mod session;
pub mod vent;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SaarthiError};
pub use gateway::{HttpGateway, SessionGateway};
pub use persona::{resolve_persona, Persona};
pub use session::{ChatSession, ChatSessionController, Message, SendOutcome};

#[cfg(test)]
pub mod test_utils;
