//! Request and response bodies of the summarization API
//!
//! Field names follow the wire format (`snake_case`, `type` for message
//! roles) so these types serialize exactly as the backend expects.

use serde::{Deserialize, Serialize};

/// Reply to `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Server-assigned session identifier
    pub session_id: String,
    /// File name as stored by the backend
    pub filename: String,
    /// Human-readable status message
    pub message: String,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Session the question is about
    pub session_id: String,
    /// The user's prompt
    pub message: String,
}

/// Reply to `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Complete answer text
    pub answer: String,
    /// Echo of the session identifier
    pub session_id: String,
}

/// Author of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A prompt typed by the user
    Human,
    /// An answer from the backend
    Ai,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "you"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// One entry of a session's chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    #[serde(rename = "type")]
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

/// Reply to `GET /chat/history/{session_id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    /// Messages in conversation order
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Reply to `DELETE /sessions/{session_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    /// Human-readable status message
    pub message: String,
}

/// Reply to `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, `healthy` when up
    pub status: String,
    /// Human-readable status message
    pub message: String,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
