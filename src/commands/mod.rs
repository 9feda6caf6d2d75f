/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`   : Interactive session across the upload, document and answer screens
- `ask`    : Upload one document, ask one question, print the answer
- `session`: One-shot history, delete and health requests

Handlers are generic over [`SummaryApi`](crate::api::SummaryApi) so they can
be driven by the in-process fake in tests; the `run_*` entry points wire in
the HTTP client.
*/

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use futures::StreamExt;

use crate::api::SummaryApi;
use crate::config::{Config, InterfaceConfig};
use crate::document::DocumentFile;
use crate::error::{QuicknoteError, Result};
use crate::render;
use crate::reveal::Reveal;
use crate::view::{Notification, NotificationLevel, SessionController, ViewState};

// Special commands parser for the interactive session
pub mod special_commands;

/// Print a reveal frame by frame; Ctrl-C shows the rest at once
async fn play_reveal(reveal: Reveal) -> Result<()> {
    let full_text = reveal.text().to_string();
    let mut frames = reveal.into_stream();
    let mut shown = 0usize;
    let mut stdout = std::io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(frame) => {
                    write!(stdout, "{}", frame.delta_since(shown))?;
                    stdout.flush()?;
                    shown = frame.end();
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                write!(stdout, "{}", &full_text[shown..])?;
                shown = full_text.len();
                break;
            }
        }
    }

    // A reveal cancelled part-way still leaves the full text on screen.
    if shown < full_text.len() {
        write!(stdout, "{}", &full_text[shown..])?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn print_notifications(notifications: Vec<Notification>) {
    for notification in notifications {
        match notification.level {
            NotificationLevel::Success => println!("{}", render::render_notification(&notification)),
            NotificationLevel::Error => eprintln!("{}", render::render_notification(&notification)),
        }
    }
}

// Interactive chat command handler
pub mod chat {
    //! Interactive session handler.
    //!
    //! Runs a readline loop over a [`SessionController`]. Slash commands
    //! map to controller actions; plain text is pasted on the upload screen
    //! and sent as the prompt on the document screen.

    use super::*;
    use crate::api::HttpSummaryApi;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::view::{FileSelection, Outcome, Screen};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive session against the configured backend
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `file` - Document to open before the first prompt
    pub async fn run_chat(config: Config, file: Option<std::path::PathBuf>) -> Result<()> {
        let api = Arc::new(HttpSummaryApi::new(&config.api)?);
        run_chat_with_api(api, config, file).await
    }

    /// Start the interactive session with an injected API client
    pub async fn run_chat_with_api<A: SummaryApi + ?Sized + 'static>(
        api: Arc<A>,
        config: Config,
        file: Option<std::path::PathBuf>,
    ) -> Result<()> {
        tracing::info!("Starting interactive session");

        let mut controller = SessionController::new(api, config.reveal.clone());
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);

        if let Some(path) = file {
            open_path(&mut controller, &config.interface, &path).await;
        } else {
            println!("{}", render::render_view(controller.view(), &config.interface));
        }

        loop {
            let prompt = format!("{} >> ", controller.screen().colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    };

                    if command == SpecialCommand::Exit {
                        break;
                    }
                    handle_command(&mut controller, &config.interface, command, trimmed).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        controller
            .shutdown(config.interface.delete_session_on_exit)
            .await;
        println!("Goodbye!");
        Ok(())
    }

    /// Apply one parsed line to the controller and redraw what changed
    pub(crate) async fn handle_command<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        interface: &InterfaceConfig,
        command: SpecialCommand,
        line: &str,
    ) {
        let outcome = match command {
            SpecialCommand::Open(path) => {
                open_path(controller, interface, &path).await;
                return;
            }
            SpecialCommand::ClearPaste => controller.clear_paste_buffer(),
            SpecialCommand::NextPage => controller.next_page(),
            SpecialCommand::PreviousPage => controller.previous_page(),
            SpecialCommand::ShowSuggestions => {
                print_suggestions(interface);
                return;
            }
            SpecialCommand::UseSuggestion(n) => match interface.suggestions.get(n - 1) {
                Some(suggestion) => controller.set_prompt(suggestion.clone()),
                None => {
                    eprintln!(
                        "No suggestion {}; there are {}",
                        n,
                        interface.suggestions.len()
                    );
                    return;
                }
            },
            SpecialCommand::Send => {
                send_and_reveal(controller, interface).await;
                return;
            }
            SpecialCommand::Back => match controller.screen() {
                Screen::Answer => controller.back_to_document(),
                _ => controller.back_to_upload(),
            },
            SpecialCommand::AskAnother => controller.ask_another_question(),
            SpecialCommand::NewAnalysis => controller.start_new_analysis(),
            SpecialCommand::History => {
                if let Some(history) = controller.history().await {
                    println!("\n{}", render::render_history(&history));
                }
                print_notifications(controller.drain_notifications());
                return;
            }
            SpecialCommand::Export(path) => {
                export_answer(controller.view(), &path).await;
                return;
            }
            SpecialCommand::ShowStatus => {
                print_status_display(controller.view());
                return;
            }
            SpecialCommand::Help => {
                print_help();
                return;
            }
            SpecialCommand::Exit => return,
            SpecialCommand::None => {
                handle_text(controller, interface, line).await;
                return;
            }
        };

        report(controller, interface, outcome).await;
    }

    /// Plain text: paste on upload, prompt on document, new question on answer
    async fn handle_text<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        interface: &InterfaceConfig,
        line: &str,
    ) {
        match controller.screen() {
            Screen::Upload => {
                controller.paste_text(&format!("{}\n", line));
                let chars = match controller.view() {
                    ViewState::Upload(view) => view.paste_buffer.chars().count(),
                    _ => 0,
                };
                let counter = format!("{}/{}", chars, interface.paste_soft_limit);
                if chars > interface.paste_soft_limit {
                    println!("{}", format!("Pasted text: {} characters", counter).yellow());
                } else {
                    println!("{}", format!("Pasted text: {} characters", counter).dimmed());
                }
            }
            Screen::DocumentChat => {
                controller.set_prompt(line);
                send_and_reveal(controller, interface).await;
            }
            Screen::Answer => {
                controller.ask_another_question();
                controller.set_prompt(line);
                send_and_reveal(controller, interface).await;
            }
        }
    }

    async fn open_path<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        interface: &InterfaceConfig,
        path: &Path,
    ) {
        if controller.screen() != Screen::Upload {
            eprintln!("Use /back to close the current document first");
            return;
        }

        let document = match DocumentFile::from_path(path).await {
            Ok(document) => document,
            Err(e) => {
                eprintln!("{}", format!("Could not open {}: {}", path.display(), e).red());
                return;
            }
        };

        let outcome = match controller.select_file(document) {
            FileSelection::Ignored => Outcome::Ignored,
            FileSelection::LoadedText => Outcome::Stayed,
            FileSelection::Pending(pending) => {
                println!(
                    "{}",
                    render::render_view(controller.view(), interface).trim_end()
                );
                let completed = pending.run().await;
                controller.complete_upload(completed)
            }
        };
        report(controller, interface, outcome).await;
    }

    async fn send_and_reveal<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        interface: &InterfaceConfig,
    ) {
        let Some(pending) = controller.submit_prompt() else {
            match controller.view() {
                ViewState::DocumentChat(view) if view.prompt.trim().is_empty() => {
                    eprintln!("Enter a prompt first");
                }
                ViewState::DocumentChat(_) => {}
                _ => eprintln!("Open a PDF before asking questions"),
            }
            return;
        };

        println!("{}", "Analyzing...".cyan());
        let completed = pending.run().await;
        let outcome = controller.complete_send(completed);
        report(controller, interface, outcome).await;
    }

    /// Print notifications, the current screen, and a fresh answer if any
    async fn report<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        interface: &InterfaceConfig,
        outcome: Outcome,
    ) {
        print_notifications(controller.drain_notifications());
        if outcome == Outcome::Ignored {
            println!("{}", "Not available on this screen".dimmed());
            return;
        }

        println!("{}", render::render_view(controller.view(), interface));
        if let Some(reveal) = controller.take_reveal() {
            if let Err(e) = play_reveal(reveal).await {
                tracing::warn!("Failed to print answer: {}", e);
            }
        }
    }

    fn print_suggestions(interface: &InterfaceConfig) {
        println!("\nQuick suggestions:");
        for (i, suggestion) in interface.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, suggestion);
        }
        println!();
    }

    async fn export_answer(view: &ViewState, path: &Path) {
        let ViewState::Answer(answer) = view else {
            eprintln!("Nothing to export; ask a question first");
            return;
        };
        let markdown = render::render_export(
            answer.document.document.name(),
            &answer.submitted_prompt,
            answer.answer.as_deref(),
            chrono::Utc::now(),
        );
        match tokio::fs::write(path, markdown).await {
            Ok(()) => println!("Saved answer to {}", path.display()),
            Err(e) => eprintln!("{}", format!("Could not write {}: {}", path.display(), e).red()),
        }
    }

    /// Display welcome banner at the start of the interactive session
    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              QuickNote Interactive Session                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Server: {}", config.api.base_url);
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display the current screen and session
    fn print_status_display(view: &ViewState) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   QuickNote Session Status                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Screen:    {}", view.screen().colored_tag());
        match view.session() {
            Some(session) => println!("Session:   {}", session),
            None => println!("Session:   {}", "none".dimmed()),
        }
        if let Some(document) = view.document() {
            println!("Document:  {} ({} bytes)", document.name(), document.len());
        }
        println!();
    }
}

// One-shot question command handler
pub mod ask {
    //! Upload a document, ask one question and print the answer.

    use super::*;
    use crate::api::HttpSummaryApi;
    use crate::view::Outcome;

    /// What a one-shot question produced
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AskResult {
        /// The answer text, or the fallback message when none came back
        pub answer: String,
        /// Session identifier, if it was kept alive
        pub kept_session: Option<String>,
    }

    /// Run `ask` against the configured backend and print the answer
    pub async fn run_ask(
        config: Config,
        file: std::path::PathBuf,
        prompt: String,
        keep_session: bool,
    ) -> Result<()> {
        let api = Arc::new(HttpSummaryApi::new(&config.api)?);
        let result = ask_with_api(api, &config, &file, &prompt, keep_session, true).await?;
        if let Some(session) = result.kept_session {
            eprintln!("Session kept: {}", session);
        }
        Ok(())
    }

    /// Upload, ask and optionally print
    ///
    /// # Errors
    ///
    /// Returns the upload or chat failure, with the backend's own message.
    pub async fn ask_with_api<A: SummaryApi + ?Sized + 'static>(
        api: Arc<A>,
        config: &Config,
        file: &Path,
        prompt: &str,
        keep_session: bool,
        print: bool,
    ) -> Result<AskResult> {
        let document = DocumentFile::from_path(file).await?;
        if !document.is_pdf() {
            return Err(QuicknoteError::FileLoad(format!(
                "{} is not a PDF; only PDFs can be asked about",
                file.display()
            ))
            .into());
        }

        let mut controller = SessionController::new(api, config.reveal.clone());

        if let Outcome::Stayed | Outcome::Ignored = controller.open_file(document).await {
            return Err(first_error(&mut controller, "Upload failed"));
        }
        controller.drain_notifications();

        controller.set_prompt(prompt);
        if !matches!(controller.send_prompt().await, Outcome::Moved { .. }) {
            let err = first_error(&mut controller, "Prompt could not be sent");
            controller.shutdown(!keep_session).await;
            return Err(err);
        }

        let reveal = controller
            .take_reveal()
            .ok_or_else(|| QuicknoteError::Session("Answer already consumed".to_string()))?;
        let answer = reveal.text().to_string();
        if print {
            play_reveal(reveal).await?;
        }

        let kept_session = if keep_session {
            controller.session().map(|s| s.to_string())
        } else {
            None
        };
        controller.shutdown(!keep_session).await;

        Ok(AskResult {
            answer,
            kept_session,
        })
    }

    fn first_error<A: SummaryApi + ?Sized + 'static>(
        controller: &mut SessionController<A>,
        fallback: &str,
    ) -> anyhow::Error {
        let message = controller
            .drain_notifications()
            .into_iter()
            .find(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message)
            .unwrap_or_else(|| fallback.to_string());
        QuicknoteError::Request(message).into()
    }

}

// Session maintenance command handlers
pub mod session {
    //! One-shot history, delete and health commands.

    use super::*;
    use crate::api::HttpSummaryApi;

    /// Print a session's chat history, as text or JSON
    pub async fn run_history(config: Config, session_id: String, json: bool) -> Result<()> {
        let api = HttpSummaryApi::new(&config.api)?;
        println!("{}", history_output(&api, &session_id, json).await?);
        Ok(())
    }

    /// Delete a session
    pub async fn run_delete(config: Config, session_id: String) -> Result<()> {
        let api = HttpSummaryApi::new(&config.api)?;
        println!("{}", delete_output(&api, &session_id).await?);
        Ok(())
    }

    /// Check that the backend is reachable
    pub async fn run_health(config: Config) -> Result<()> {
        let api = HttpSummaryApi::new(&config.api)?;
        println!("{}", health_output(&api).await?);
        Ok(())
    }

    fn require_session(session_id: &str) -> Result<&str> {
        let trimmed = session_id.trim();
        if trimmed.is_empty() {
            return Err(QuicknoteError::Session("Session id must not be empty".to_string()).into());
        }
        Ok(trimmed)
    }

    /// Text printed by the history command
    pub async fn history_output<A: SummaryApi + ?Sized>(
        api: &A,
        session_id: &str,
        json: bool,
    ) -> Result<String> {
        let history = api.get_chat_history(require_session(session_id)?).await?;
        if json {
            Ok(serde_json::to_string_pretty(&history)?)
        } else {
            Ok(render::render_history(&history).trim_end().to_string())
        }
    }

    /// Text printed by the delete command
    pub async fn delete_output<A: SummaryApi + ?Sized>(api: &A, session_id: &str) -> Result<String> {
        let reply = api.delete_session(require_session(session_id)?).await?;
        Ok(reply.message)
    }

    /// Text printed by the health command
    pub async fn health_output<A: SummaryApi + ?Sized>(api: &A) -> Result<String> {
        let reply = api.health_check().await?;
        Ok(format!("{}: {}", reply.status, reply.message))
    }

}
