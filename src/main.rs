//! QuickNote - terminal client for a research-paper summarization service
//!
#![doc = "Main entry point for the QuickNote application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quicknote::cli::{Cli, Commands};
use quicknote::commands;
use quicknote::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { file } => {
            if let Some(path) = &file {
                tracing::debug!("Opening document: {}", path.display());
            }
            commands::chat::run_chat(config, file).await?;
            Ok(())
        }
        Commands::Ask {
            file,
            prompt,
            keep_session,
        } => {
            tracing::info!("Asking a single question");
            tracing::debug!("Document: {}", file.display());
            commands::ask::run_ask(config, file, prompt, keep_session).await?;
            Ok(())
        }
        Commands::History { session, json } => {
            commands::session::run_history(config, session, json).await?;
            Ok(())
        }
        Commands::Delete { session } => {
            commands::session::run_delete(config, session).await?;
            Ok(())
        }
        Commands::Health => {
            commands::session::run_health(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with revealed answers.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "quicknote=debug"
    } else {
        "quicknote=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
