//! Terminal rendering for the three screens
//!
//! Every function here is pure: it turns state into a `String` and leaves
//! printing to the caller. [`render_view`] matches the view exhaustively, so
//! a new screen cannot be added without a way to draw it.

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::api::{ChatHistoryResponse, MessageRole};
use crate::config::InterfaceConfig;
use crate::reveal::FALLBACK_MESSAGE;
use crate::view::{
    AnswerView, DocumentChatView, Notification, NotificationLevel, UploadView, ViewState,
};

/// Lines of the paste buffer shown on the upload screen
const PASTE_PREVIEW_LINES: usize = 5;

/// Draw the current screen
pub fn render_view(view: &ViewState, interface: &InterfaceConfig) -> String {
    match view {
        ViewState::Upload(upload) => render_upload(upload, interface),
        ViewState::DocumentChat(document) => render_document(document, interface),
        ViewState::Answer(answer) => render_answer_header(answer),
    }
}

/// Draw the upload screen: paste counter, buffer preview and upload status
pub fn render_upload(view: &UploadView, interface: &InterfaceConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "Upload a research paper".bold()));
    out.push_str("Paste text below, or use /open <path> to upload a PDF.\n\n");

    let chars = view.paste_buffer.chars().count();
    let counter = format!("{}/{}", chars, interface.paste_soft_limit);
    if chars > interface.paste_soft_limit {
        out.push_str(&format!("Pasted text: {} characters\n", counter.yellow()));
    } else {
        out.push_str(&format!("Pasted text: {} characters\n", counter));
    }

    let mut lines = view.paste_buffer.lines();
    for line in lines.by_ref().take(PASTE_PREVIEW_LINES) {
        out.push_str(&format!("  {} {}\n", "│".dimmed(), line));
    }
    if lines.next().is_some() {
        out.push_str(&format!("  {}\n", "…".dimmed()));
    }

    if view.is_uploading {
        out.push_str(&format!("\n{}\n", "Uploading...".cyan()));
    }
    out
}

/// Draw the document screen: file, page indicator, suggestions and prompt
pub fn render_document(view: &DocumentChatView, interface: &InterfaceConfig) -> String {
    let mut out = String::new();
    let kib = (view.document.len() + 1023) / 1024;
    out.push_str(&format!(
        "\n{} {} ({} KiB)\n",
        "Document:".bold(),
        view.document.name(),
        kib
    ));

    let pages = &view.pagination;
    let indicator = format!("Page {} of {}", pages.page(), pages.num_pages());
    if pages.is_multi_page() {
        let prev = if pages.has_previous() { "/prev" } else { "" };
        let next = if pages.has_next() { "/next" } else { "" };
        out.push_str(&format!(
            "{}  {}\n",
            indicator,
            format!("{} {}", prev, next).trim().dimmed()
        ));
    } else {
        out.push_str(&format!("{}\n", indicator));
    }

    if !interface.suggestions.is_empty() {
        out.push_str("\nQuick suggestions:\n");
        for (i, suggestion) in interface.suggestions.iter().enumerate() {
            let line = format!("  {}. {}", i + 1, suggestion);
            if view.is_sending {
                out.push_str(&format!("{}\n", line.dimmed()));
            } else {
                out.push_str(&format!("{}\n", line));
            }
        }
    }

    out.push('\n');
    if view.prompt.is_empty() {
        out.push_str(&format!("Prompt: {}\n", "(empty)".dimmed()));
    } else {
        out.push_str(&format!("Prompt: {}\n", view.prompt));
    }

    if view.is_sending {
        out.push_str(&format!("{}\n", "Analyzing...".cyan()));
    }
    out
}

/// Draw the answer screen up to where the revealed text begins
pub fn render_answer_header(view: &AnswerView) -> String {
    format!(
        "\n{}\n{}\n\n{}\n",
        "Your prompt:".bold(),
        view.submitted_prompt,
        "Answer:".bold()
    )
}

/// Draw a notification
pub fn render_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!(
            "{} {}",
            format!("[{}]", notification.title).green(),
            notification.message
        ),
        NotificationLevel::Error => format!(
            "{} {}",
            format!("[{}]", notification.title).red(),
            notification.message
        ),
    }
}

/// Draw a chat transcript
pub fn render_history(history: &ChatHistoryResponse) -> String {
    if history.messages.is_empty() {
        return "No messages in this session yet.\n".to_string();
    }

    let mut out = String::new();
    for message in &history.messages {
        let label = match message.role {
            MessageRole::Human => format!("{}:", message.role).cyan(),
            MessageRole::Ai => format!("{}:", message.role).green(),
        };
        out.push_str(&format!("{} {}\n\n", label, message.content));
    }
    out
}

/// Markdown document holding the prompt and answer of an answer screen
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use quicknote::render::render_export;
///
/// let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
/// let md = render_export("paper.pdf", "Summarize", Some("It is short."), when);
/// assert!(md.starts_with("# paper.pdf"));
/// assert!(md.contains("## Answer\n\nIt is short."));
/// ```
pub fn render_export(
    document_name: &str,
    prompt: &str,
    answer: Option<&str>,
    exported_at: DateTime<Utc>,
) -> String {
    let answer = answer.filter(|a| !a.is_empty()).unwrap_or(FALLBACK_MESSAGE);
    format!(
        "# {}\n\n_Exported {}_\n\n## Prompt\n\n{}\n\n## Answer\n\n{}\n",
        document_name,
        exported_at.format("%Y-%m-%d %H:%M:%S UTC"),
        prompt,
        answer
    )
}
