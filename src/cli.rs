//! Command-line interface definition for QuickNote
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive session plus one-shot commands against
//! the summarization API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QuickNote - ask questions about research papers from the terminal
///
/// Upload a PDF to the summarization service, ask questions about it,
/// and read the answers as they are revealed.
#[derive(Parser, Debug, Clone)]
#[command(name = "quicknote")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the API base URL (e.g. http://localhost:5000/api)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Print answers at once instead of revealing them incrementally
    #[arg(long)]
    pub no_reveal: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for QuickNote
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive session (upload, ask, read answers)
    Chat {
        /// Document to open immediately
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Upload a document, ask a single question, and print the answer
    Ask {
        /// PDF document to upload
        #[arg(short, long)]
        file: PathBuf,

        /// Question or summarization request
        #[arg(short, long)]
        prompt: String,

        /// Leave the server-side session alive and print its identifier
        #[arg(long)]
        keep_session: bool,
    },

    /// Show the chat history of a session
    History {
        /// Session identifier returned by an upload
        #[arg(short, long)]
        session: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Delete a server-side session
    Delete {
        /// Session identifier returned by an upload
        #[arg(short, long)]
        session: String,
    },

    /// Check that the summarization API is reachable
    Health,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            api_url: None,
            no_reveal: false,
            command: Commands::Chat { file: None },
        }
    }
}
