//! Summarization API abstraction
//!
//! The [`SummaryApi`] trait is the seam between the session controller and
//! the backend. [`HttpSummaryApi`] talks to the real service over HTTP;
//! [`fake::FakeSummaryApi`] is an in-process stand-in for tests.
//!
//! Every call is a single attempt. Failures of `upload_file` are
//! [`QuicknoteError::Upload`](crate::error::QuicknoteError::Upload), all
//! others are [`QuicknoteError::Request`](crate::error::QuicknoteError::Request),
//! carrying the backend's `error` field when it sent one.

pub mod fake;
pub mod http;
pub mod types;

pub use http::HttpSummaryApi;
pub use types::{
    ChatHistoryResponse, ChatMessage, ChatRequest, ChatResponse, DeleteSessionResponse,
    HealthResponse, MessageRole, UploadResponse,
};

use crate::document::DocumentFile;
use crate::error::Result;
use async_trait::async_trait;

/// Operations offered by the summarization backend
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Upload a document and open a session for it
    ///
    /// # Errors
    ///
    /// Returns `QuicknoteError::Upload` on transport failure or non-2xx reply
    async fn upload_file(&self, file: &DocumentFile) -> Result<UploadResponse>;

    /// Ask a question about the document behind `session_id`
    ///
    /// # Errors
    ///
    /// Returns `QuicknoteError::Request` on transport failure or non-2xx reply
    async fn send_message(&self, session_id: &str, message: &str) -> Result<ChatResponse>;

    /// Fetch the questions and answers exchanged in a session
    ///
    /// # Errors
    ///
    /// Returns `QuicknoteError::Request` on transport failure or non-2xx reply
    async fn get_chat_history(&self, session_id: &str) -> Result<ChatHistoryResponse>;

    /// Drop a session on the server
    ///
    /// # Errors
    ///
    /// Returns `QuicknoteError::Request` on transport failure or non-2xx reply
    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse>;

    /// Probe service health
    ///
    /// # Errors
    ///
    /// Returns `QuicknoteError::Request` on transport failure or non-2xx reply
    async fn health_check(&self) -> Result<HealthResponse>;
}
