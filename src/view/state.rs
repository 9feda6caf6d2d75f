//! View state types
//!
//! [`ViewState`] is a tagged union of the three screens. Each variant owns
//! exactly the data its screen needs, so the screen invariants hold by
//! construction: the upload screen has no session, the document screen
//! always has one, and the answer screen always has a session plus the
//! prompt that produced it.

use std::fmt;

use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::document::DocumentFile;

/// Server-assigned session identifier, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a session identifier, rejecting empty or blank ones
    ///
    /// # Examples
    ///
    /// ```
    /// use quicknote::view::SessionId;
    ///
    /// assert!(SessionId::new("abc123").is_some());
    /// assert!(SessionId::new("  ").is_none());
    /// ```
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// The identifier as sent to the backend
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Paste text or pick a file
    Upload,
    /// Document preview next to the prompt box
    DocumentChat,
    /// Prompt and revealed answer
    Answer,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "UPLOAD"),
            Self::DocumentChat => write!(f, "DOCUMENT"),
            Self::Answer => write!(f, "ANSWER"),
        }
    }
}

impl Screen {
    /// Colored tag for the interactive prompt
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Upload => format!("[{}]", "UPLOAD".cyan()),
            Self::DocumentChat => format!("[{}]", "DOCUMENT".green()),
            Self::Answer => format!("[{}]", "ANSWER".purple()),
        }
    }
}

/// Preview page position, always within `[1, num_pages]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    num_pages: usize,
}

impl Pagination {
    /// Start at page 1 of `num_pages` (at least one page)
    pub fn new(num_pages: usize) -> Self {
        Self {
            page: 1,
            num_pages: num_pages.max(1),
        }
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    /// Total pages
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Move forward one page, staying on the last page
    pub fn next(&mut self) {
        self.page = (self.page + 1).min(self.num_pages);
    }

    /// Move back one page, staying on the first page
    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Whether there is a page after the current one
    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    /// Whether there is a page before the current one
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether navigation controls are worth showing
    pub fn is_multi_page(&self) -> bool {
        self.num_pages > 1
    }
}

/// Upload screen fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadView {
    /// Locally pasted or decoded text; never sent anywhere
    pub paste_buffer: String,
    /// An upload is in flight; file selection is disabled
    pub is_uploading: bool,
}

/// Document screen fields, kept while moving between document and answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChatView {
    /// Session the document was uploaded into
    pub session: SessionId,
    /// The uploaded document, kept for preview
    pub document: DocumentFile,
    /// Preview position
    pub pagination: Pagination,
    /// Prompt box content
    pub prompt: String,
    /// A prompt is in flight; submitting and suggestions are disabled
    pub is_sending: bool,
}

impl DocumentChatView {
    /// Whether the prompt can be sent right now
    pub fn can_send(&self) -> bool {
        !self.is_sending && !self.prompt.trim().is_empty()
    }
}

/// Answer screen fields
#[derive(Debug, Clone)]
pub struct AnswerView {
    /// Document screen state to return to
    pub document: DocumentChatView,
    /// The prompt that produced the answer
    pub submitted_prompt: String,
    /// The answer, if the backend produced one
    pub answer: Option<String>,
    /// Fires when the screen is left, ending any running reveal
    pub(crate) reveal_cancel: CancellationToken,
    /// Whether the reveal for this answer has been handed out
    pub(crate) reveal_taken: bool,
}

/// The three screens and their data
#[derive(Debug, Clone)]
pub enum ViewState {
    /// Initial screen, no session
    Upload(UploadView),
    /// Split view, session present
    DocumentChat(DocumentChatView),
    /// Answer display, session and submitted prompt present
    Answer(AnswerView),
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Upload(UploadView::default())
    }
}

impl ViewState {
    /// Discriminator of the current variant
    pub fn screen(&self) -> Screen {
        match self {
            Self::Upload(_) => Screen::Upload,
            Self::DocumentChat(_) => Screen::DocumentChat,
            Self::Answer(_) => Screen::Answer,
        }
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&SessionId> {
        match self {
            Self::Upload(_) => None,
            Self::DocumentChat(view) => Some(&view.session),
            Self::Answer(view) => Some(&view.document.session),
        }
    }

    /// The document shown in the preview, if any
    pub fn document(&self) -> Option<&DocumentFile> {
        match self {
            Self::Upload(_) => None,
            Self::DocumentChat(view) => Some(&view.document),
            Self::Answer(view) => Some(&view.document.document),
        }
    }
}
