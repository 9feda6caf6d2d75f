//! Special commands parser for interactive chat mode
//!
//! Slash commands drive the screens of the interactive session: opening a
//! document, paging through it, sending the prompt, and navigating between
//! the document and answer screens. Anything that is not a command is plain
//! text, handled according to the current screen.
//!
//! Command names are case-insensitive; arguments (file paths) keep their case.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Load a file: PDFs are uploaded, anything else fills the paste buffer
    Open(PathBuf),

    /// Empty the paste buffer
    ClearPaste,

    /// Show the next preview page
    NextPage,

    /// Show the previous preview page
    PreviousPage,

    /// List the quick suggestions
    ShowSuggestions,

    /// Copy quick suggestion `n` (1-based) into the prompt box
    UseSuggestion(usize),

    /// Send the prompt box content
    Send,

    /// Leave the current screen: answer → document, document → upload
    Back,

    /// From the answer screen, return to the document with an empty prompt
    AskAnother,

    /// From the answer screen, drop the document and start over
    NewAnalysis,

    /// Print the session's chat history
    History,

    /// Write the current prompt and answer to a Markdown file
    Export(PathBuf),

    /// Display session status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a valid command.
/// Returns `CommandError::UnsupportedArgument` if a command receives an invalid argument.
/// Returns `CommandError::MissingArgument` if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use quicknote::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/open Papers/Attention.pdf").unwrap();
/// assert_eq!(cmd, SpecialCommand::Open(PathBuf::from("Papers/Attention.pdf")));
///
/// let cmd = parse_special_command("/suggest 2").unwrap();
/// assert_eq!(cmd, SpecialCommand::UseSuggestion(2));
///
/// let cmd = parse_special_command("What is the main result?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/open" | "/upload" => {
            if arg.is_empty() {
                Err(missing("/open", "/open <path>"))
            } else {
                Ok(SpecialCommand::Open(PathBuf::from(arg)))
            }
        }
        "/export" => {
            if arg.is_empty() {
                Err(missing("/export", "/export <path.md>"))
            } else {
                Ok(SpecialCommand::Export(PathBuf::from(arg)))
            }
        }
        "/suggest" if arg.is_empty() => Ok(SpecialCommand::ShowSuggestions),
        "/suggest" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(SpecialCommand::UseSuggestion(n)),
            _ => Err(unsupported("/suggest", arg)),
        },

        // The rest take no argument.
        _ if !arg.is_empty() && is_known(&name) => Err(unsupported(&name, arg)),

        "/clear" => Ok(SpecialCommand::ClearPaste),
        "/next" | "/n" => Ok(SpecialCommand::NextPage),
        "/prev" | "/previous" | "/p" => Ok(SpecialCommand::PreviousPage),
        "/send" => Ok(SpecialCommand::Send),
        "/back" => Ok(SpecialCommand::Back),
        "/again" => Ok(SpecialCommand::AskAnother),
        "/new" => Ok(SpecialCommand::NewAnalysis),
        "/history" => Ok(SpecialCommand::History),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn is_known(name: &str) -> bool {
    matches!(
        name,
        "/clear"
            | "/next"
            | "/n"
            | "/prev"
            | "/previous"
            | "/p"
            | "/send"
            | "/back"
            | "/again"
            | "/new"
            | "/history"
            | "/status"
            | "/help"
            | "/?"
            | "/exit"
            | "/quit"
    )
}

/// Display help text for special commands
///
/// # Examples
///
/// ```
/// use quicknote::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Mode
=====================================

UPLOAD SCREEN:
  /open <path>    - Upload a PDF, or load any other file into the paste buffer
  /upload <path>  - Same as /open
  /clear          - Empty the paste buffer
  (plain text)    - Appended to the paste buffer

DOCUMENT SCREEN:
  /next, /n       - Show the next page
  /prev, /p       - Show the previous page
  /suggest        - List quick suggestions
  /suggest <n>    - Copy suggestion n into the prompt
  /send           - Send the prompt
  /history        - Show the questions and answers for this document
  /back           - Close the document and return to upload
  (plain text)    - Set the prompt and send it

ANSWER SCREEN:
  /back           - Return to the document, keeping the prompt
  /again          - Return to the document with an empty prompt
  /new            - Close the document and start a new analysis
  /export <path>  - Save the prompt and answer as Markdown

SESSION:
  /status         - Show the current screen and session
  /help, /?       - Show this help message
  /exit, exit     - Close the session and quit

NOTES:
  - Commands are case-insensitive; paths are not
  - Pasted text stays local; only uploaded PDFs can be asked about
"#
    );
}
