//! Error types for Saarthi
//!
//! This module defines the error taxonomy shared by the gateway, the session
//! controller, configuration loading, and the terminal front end, using
//! `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Saarthi operations
///
/// Transport failures are reported as [`SaarthiError::Gateway`] or
/// [`SaarthiError::Remote`]; misuse that the controller refuses before any
/// network call is reported as [`SaarthiError::SpecialSessionReadOnly`] or
/// [`SaarthiError::UnknownSession`].
#[derive(Error, Debug)]
pub enum SaarthiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote service unreachable, non-success status, or malformed body
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Remote service rejected the request with a human-readable message
    #[error("{message}")]
    Remote {
        /// HTTP status code returned by the service
        status: u16,
        /// Message supplied by the service, surfaced verbatim
        message: String,
    },

    /// Operation attempted on the embedded read-only session
    #[error("The session '{0}' is read-only and cannot be modified")]
    SpecialSessionReadOnly(String),

    /// Session id is not present in the registry
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Line editor errors from the interactive front end
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Saarthi operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// [`SaarthiError`] stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
