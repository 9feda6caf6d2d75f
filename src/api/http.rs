//! HTTP implementation of the summarization API
//!
//! Uses a single `reqwest` client with a cookie store so the backend can
//! keep session affinity across calls (the equivalent of sending requests
//! with credentials included).

use crate::api::types::{
    ApiErrorBody, ChatHistoryResponse, ChatRequest, ChatResponse, DeleteSessionResponse,
    HealthResponse, UploadResponse,
};
use crate::api::SummaryApi;
use crate::config::ApiConfig;
use crate::document::DocumentFile;
use crate::error::{QuicknoteError, Result};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Summarization API client over HTTP
///
/// # Examples
///
/// ```
/// use quicknote::api::HttpSummaryApi;
/// use quicknote::config::ApiConfig;
///
/// let api = HttpSummaryApi::new(&ApiConfig::default()).unwrap();
/// assert_eq!(api.base_url(), "http://localhost:5000/api");
/// ```
#[derive(Debug, Clone)]
pub struct HttpSummaryApi {
    client: Client,
    base_url: Url,
    max_upload_bytes: u64,
}

impl HttpSummaryApi {
    /// Create a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(QuicknoteError::Config(format!(
                "API base URL cannot carry paths: {}",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("quicknote/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .build()
            .map_err(|e| QuicknoteError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(base_url = %base_url, "Initialized summarization API client");

        Ok(Self {
            client,
            base_url,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Configured base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL by appending path segments to the base URL
    ///
    /// Segments are percent-encoded, so session identifiers can never
    /// escape their path position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                QuicknoteError::Config(format!("API base URL cannot carry paths: {}", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and decode a JSON reply, mapping failures to `Request` errors
    async fn request_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} request failed: {}", operation, e);
            QuicknoteError::Request(format!("Failed to reach server: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = backend_error(response)
                .await
                .unwrap_or_else(|| format!("HTTP status {}", status.as_u16()));
            tracing::error!("{} returned error {}: {}", operation, status, message);
            return Err(QuicknoteError::Request(message).into());
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", operation, e);
            QuicknoteError::Request(format!("Invalid {} response: {}", operation, e)).into()
        })
    }
}

/// The backend's `error` field, if the body is JSON and carries a non-empty one
async fn backend_error(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    serde_json::from_str::<ApiErrorBody>(&body)
        .ok()?
        .error
        .filter(|e| !e.trim().is_empty())
}

#[async_trait]
impl SummaryApi for HttpSummaryApi {
    async fn upload_file(&self, file: &DocumentFile) -> Result<UploadResponse> {
        if file.len() as u64 > self.max_upload_bytes {
            return Err(QuicknoteError::Upload(format!(
                "File is {} bytes, larger than the {} byte upload limit",
                file.len(),
                self.max_upload_bytes
            ))
            .into());
        }

        let url = self.endpoint(&["upload"])?;
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| QuicknoteError::Upload(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        tracing::debug!(name = %file.name(), size = file.len(), "Uploading document");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Upload request failed: {}", e);
                QuicknoteError::Upload(format!("Failed to reach server: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = backend_error(response)
                .await
                .unwrap_or_else(|| format!("Upload failed: HTTP status {}", status.as_u16()));
            tracing::error!("Upload returned error {}: {}", status, message);
            return Err(QuicknoteError::Upload(message).into());
        }

        response.json::<UploadResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse upload response: {}", e);
            QuicknoteError::Upload(format!("Invalid upload response: {}", e)).into()
        })
    }

    async fn send_message(&self, session_id: &str, message: &str) -> Result<ChatResponse> {
        let url = self.endpoint(&["chat"])?;
        let body = ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        };
        tracing::debug!(session_id = %session_id, chars = message.chars().count(), "Sending prompt");
        self.request_json(self.client.post(url).json(&body), "chat")
            .await
    }

    async fn get_chat_history(&self, session_id: &str) -> Result<ChatHistoryResponse> {
        let url = self.endpoint(&["chat", "history", session_id])?;
        self.request_json(self.client.get(url), "history").await
    }

    async fn delete_session(&self, session_id: &str) -> Result<DeleteSessionResponse> {
        let url = self.endpoint(&["sessions", session_id])?;
        tracing::debug!(session_id = %session_id, "Deleting session");
        self.request_json(self.client.delete(url), "delete session")
            .await
    }

    async fn health_check(&self) -> Result<HealthResponse> {
        let url = self.endpoint(&["health"])?;
        self.request_json(self.client.get(url), "health").await
    }
}
