//! QuickNote - terminal client for a research-paper summarization service
//!
//! This library provides the client side of a document question-answering
//! workflow: upload a PDF, ask questions about it, and read the answers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: The summarization API trait, its HTTP client, and an in-process fake
//! - `view`: Screen state and the controller that drives it
//! - `reveal`: Incremental, cancellable answer reveal
//! - `render`: Terminal rendering of each screen
//! - `document`: Local documents (name, MIME type, bytes, page count)
//! - `commands`: Interactive session and one-shot command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quicknote::api::HttpSummaryApi;
//! use quicknote::document::DocumentFile;
//! use quicknote::view::SessionController;
//! use quicknote::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let api = Arc::new(HttpSummaryApi::new(&config.api)?);
//!     let mut controller = SessionController::new(api, config.reveal.clone());
//!     controller.open_file(DocumentFile::from_path("paper.pdf").await?).await;
//!     controller.set_prompt("Summarize the key findings");
//!     controller.send_prompt().await;
//!     controller.shutdown(true).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod render;
pub mod reveal;
pub mod view;

// Re-export commonly used types
pub use api::{HttpSummaryApi, SummaryApi};
pub use config::Config;
pub use document::DocumentFile;
pub use error::{QuicknoteError, Result};
pub use view::{SessionController, ViewState};

#[cfg(test)]
pub mod test_utils;
