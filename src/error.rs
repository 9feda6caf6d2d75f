//! Error types for QuickNote
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for QuickNote operations
///
/// Covers configuration loading, document handling, the summarization API
/// boundary, and session bookkeeping.
#[derive(Error, Debug)]
pub enum QuicknoteError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document upload failed (non-2xx response or unusable upload reply)
    ///
    /// The payload is the message the backend reported, or a generic
    /// status-code message when the body carried none.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Any other API request failed (chat, history, delete, health)
    #[error("Request error: {0}")]
    Request(String),

    /// Best-effort session deletion failed
    ///
    /// Never shown to the user; only written to the log.
    #[error("Session cleanup failed: {0}")]
    Cleanup(String),

    /// Local file loading errors (missing file, size limit)
    #[error("File load error: {0}")]
    FileLoad(String),

    /// Session identifier problems (empty or malformed)
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL construction errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl QuicknoteError {
    /// Message suitable for a user-facing notification
    ///
    /// API failures carry the backend's own wording, so they are shown
    /// without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upload(msg) | Self::Request(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for QuickNote operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Extract the notification text for an error
///
/// Unwraps a [`QuicknoteError`] boxed inside `anyhow::Error` when present;
/// anything else is rendered with its display string.
///
/// # Examples
///
/// ```
/// use quicknote::error::{user_message, QuicknoteError};
///
/// let err: anyhow::Error = QuicknoteError::Upload("file too large".to_string()).into();
/// assert_eq!(user_message(&err), "file too large");
/// ```
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<QuicknoteError>() {
        Some(e) => e.user_message(),
        None => err.to_string(),
    }
}
