//! In-process fake of the summarization API
//!
//! [`FakeSummaryApi`] implements [`SummaryApi`] without any network I/O.
//! Replies are scripted up front with the builder methods and every call is
//! recorded, so tests can assert both on controller state and on exactly
//! which requests were issued.
//!
//! Successful chat calls are remembered per session and replayed by
//! `get_chat_history`, mirroring what the real backend does.
//!
//! # Example
//!
//! ```
//! use quicknote::api::fake::{ApiCall, FakeSummaryApi};
//! use quicknote::api::SummaryApi;
//!
//! # tokio_test::block_on(async {
//! let api = FakeSummaryApi::new().with_answer("It works.");
//! let reply = api.send_message("s1", "Does it work?").await.unwrap();
//! assert_eq!(reply.answer, "It works.");
//! assert_eq!(
//!     api.calls(),
//!     vec![ApiCall::Chat { session_id: "s1".to_string(), message: "Does it work?".to_string() }]
//! );
//! # });
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::types::{
    ChatHistoryResponse, ChatMessage, ChatResponse, DeleteSessionResponse, HealthResponse,
    MessageRole, UploadResponse,
};
use crate::api::SummaryApi;
use crate::document::DocumentFile;
use crate::error::{QuicknoteError, Result};

/// A request received by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `upload_file` with the document's name
    Upload { filename: String },
    /// `send_message`
    Chat { session_id: String, message: String },
    /// `get_chat_history`
    History { session_id: String },
    /// `delete_session`
    DeleteSession { session_id: String },
    /// `health_check`
    Health,
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ApiCall>,
    upload: std::result::Result<String, String>,
    chat: std::result::Result<String, String>,
    delete_error: Option<String>,
    history: HashMap<String, Vec<ChatMessage>>,
}

/// Scripted, call-recording implementation of [`SummaryApi`]
#[derive(Debug)]
pub struct FakeSummaryApi {
    state: Mutex<FakeState>,
}

impl Default for FakeSummaryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSummaryApi {
    /// A fake that accepts every upload as session `fake-session` and
    /// answers every prompt with `fake answer`
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                upload: Ok("fake-session".to_string()),
                chat: Ok("fake answer".to_string()),
                delete_error: None,
                history: HashMap::new(),
            }),
        }
    }

    /// Session identifier returned by successful uploads
    pub fn with_session_id(self, session_id: impl Into<String>) -> Self {
        self.lock().upload = Ok(session_id.into());
        self
    }

    /// Answer returned by successful chat calls
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        self.lock().chat = Ok(answer.into());
        self
    }

    /// Make uploads fail with the given backend message
    pub fn failing_upload(self, message: impl Into<String>) -> Self {
        self.lock().upload = Err(message.into());
        self
    }

    /// Make chat calls fail with the given backend message
    pub fn failing_chat(self, message: impl Into<String>) -> Self {
        self.lock().chat = Err(message.into());
        self
    }

    /// Make session deletion fail with the given backend message
    pub fn failing_delete(self, message: impl Into<String>) -> Self {
        self.lock().delete_error = Some(message.into());
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of `upload_file` calls
    pub fn upload_count(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::Upload { .. }))
    }

    /// Number of `send_message` calls
    pub fn chat_count(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::Chat { .. }))
    }

    /// Number of `delete_session` calls
    pub fn delete_count(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::DeleteSession { .. }))
    }

    fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        // A panicking test thread must not hide the recorded calls from others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SummaryApi for FakeSummaryApi {
    async fn upload_file(&self, file: &DocumentFile) -> Result<UploadResponse> {
        let mut state = self.lock();
        state.calls.push(ApiCall::Upload {
            filename: file.name().to_string(),
        });
        match &state.upload {
            Ok(session_id) => Ok(UploadResponse {
                session_id: session_id.clone(),
                filename: file.name().to_string(),
                message: "File uploaded and processed successfully".to_string(),
            }),
            Err(message) => Err(QuicknoteError::Upload(message.clone()).into()),
        }
    }

    async fn send_message(&self, session_id: &str, message: &str) -> Result<ChatResponse> {
        let mut state = self.lock();
        state.calls.push(ApiCall::Chat {
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
        let answer = match &state.chat {
            Ok(answer) => answer.clone(),
            Err(error) => return Err(QuicknoteError::Request(error.clone()).into()),
        };
        let history = state.history.entry(session_id.to_string()).or_default();
        history.push(ChatMessage {
            role: MessageRole::Human,
            content: message.to_string(),
        });
        history.push(ChatMessage {
            role: MessageRole::Ai,
            content: answer.clone(),
        });
        Ok(ChatResponse {
            answer,
            session_id: session_id.to_string(),
        })
    }

    async fn get_chat_history(&self, session_id: &str) -> Result<ChatHistoryResponse> {
        let mut state = self.lock();
        state.calls.push(ApiCall::History {
            session_id: session_id.to_string(),
        });
        Ok(ChatHistoryResponse {
            messages: state.history.get(session_id).cloned().unwrap_or_default(),
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse> {
        let mut state = self.lock();
        state.calls.push(ApiCall::DeleteSession {
            session_id: session_id.to_string(),
        });
        if let Some(error) = &state.delete_error {
            return Err(QuicknoteError::Request(error.clone()).into());
        }
        state.history.remove(session_id);
        Ok(DeleteSessionResponse {
            message: "Session deleted successfully".to_string(),
        })
    }

    async fn health_check(&self) -> Result<HealthResponse> {
        self.lock().calls.push(ApiCall::Health);
        Ok(HealthResponse {
            status: "healthy".to_string(),
            message: "fake API is running".to_string(),
        })
    }
}
