//! Session controller
//!
//! [`SessionController`] owns the [`ViewState`] and is its only writer. User
//! actions arrive as method calls; network work is split in two phases so
//! the loading flags are observable while a request is in flight:
//!
//! 1. `select_file` / `submit_prompt` flip the loading flag and hand back a
//!    pending request that borrows nothing from the controller,
//! 2. the caller awaits it and passes the result to `complete_upload` /
//!    `complete_send`, which performs the transition.
//!
//! `open_file` and `send_prompt` chain both phases for callers that do not
//! need to render in between. A completion that arrives after the user left
//! the originating screen is discarded.
//!
//! Session deletion is best-effort: it runs on a spawned task, and a failure
//! is written to the log and nowhere else.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{ChatHistoryResponse, ChatResponse, SummaryApi, UploadResponse};
use crate::config::RevealConfig;
use crate::document::DocumentFile;
use crate::error::{user_message, QuicknoteError, Result};
use crate::reveal::Reveal;
use crate::view::state::{
    AnswerView, DocumentChatView, Pagination, Screen, SessionId, UploadView, ViewState,
};

/// Result of a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not applicable in the current state; nothing happened
    Ignored,
    /// Handled without changing screens
    Stayed,
    /// Handled and moved to another screen
    Moved { from: Screen, to: Screen },
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Operation failed; the view is unchanged
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Short heading, e.g. "Upload Error"
    pub title: String,
    /// Message body; for API failures the backend's own text
    pub message: String,
}

/// What selecting a file did
pub enum FileSelection<A: ?Sized> {
    /// Not on the upload screen, or an upload is already in flight
    Ignored,
    /// Non-PDF content was decoded into the paste buffer
    LoadedText,
    /// A PDF upload is ready to run
    Pending(PendingUpload<A>),
}

/// An upload that has been started but not yet sent
pub struct PendingUpload<A: ?Sized> {
    api: Arc<A>,
    document: DocumentFile,
}

impl<A: SummaryApi + ?Sized> PendingUpload<A> {
    /// Document being uploaded
    pub fn document(&self) -> &DocumentFile {
        &self.document
    }

    /// Perform the upload request
    pub async fn run(self) -> CompletedUpload {
        let result = self.api.upload_file(&self.document).await;
        CompletedUpload {
            document: self.document,
            result,
        }
    }
}

/// A finished upload request, ready for [`SessionController::complete_upload`]
pub struct CompletedUpload {
    document: DocumentFile,
    result: Result<UploadResponse>,
}

/// A prompt submission that has been started but not yet sent
pub struct PendingSend<A: ?Sized> {
    api: Arc<A>,
    session: SessionId,
    prompt: String,
}

impl<A: SummaryApi + ?Sized> PendingSend<A> {
    /// Prompt being sent
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Perform the chat request
    pub async fn run(self) -> CompletedSend {
        let result = self
            .api
            .send_message(self.session.as_str(), &self.prompt)
            .await;
        CompletedSend {
            session: self.session,
            prompt: self.prompt,
            result,
        }
    }
}

/// A finished chat request, ready for [`SessionController::complete_send`]
pub struct CompletedSend {
    session: SessionId,
    prompt: String,
    result: Result<ChatResponse>,
}

/// Drives the upload → document → answer screens
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use quicknote::api::fake::FakeSummaryApi;
/// use quicknote::config::RevealConfig;
/// use quicknote::document::DocumentFile;
/// use quicknote::view::{Outcome, Screen, SessionController};
///
/// # tokio_test::block_on(async {
/// let api = Arc::new(FakeSummaryApi::new().with_session_id("abc123"));
/// let mut controller = SessionController::new(api, RevealConfig::default());
///
/// let pdf = DocumentFile::from_bytes("paper.pdf", b"%PDF-1.4".to_vec());
/// let outcome = controller.open_file(pdf).await;
/// assert_eq!(outcome, Outcome::Moved { from: Screen::Upload, to: Screen::DocumentChat });
/// assert_eq!(controller.session().unwrap().as_str(), "abc123");
/// # });
/// ```
pub struct SessionController<A: ?Sized> {
    api: Arc<A>,
    view: ViewState,
    reveal_config: RevealConfig,
    notifications: VecDeque<Notification>,
    cleanups: Vec<JoinHandle<()>>,
}

impl<A: SummaryApi + ?Sized + 'static> SessionController<A> {
    /// Create a controller on the upload screen
    pub fn new(api: Arc<A>, reveal_config: RevealConfig) -> Self {
        Self {
            api,
            view: ViewState::default(),
            reveal_config,
            notifications: VecDeque::new(),
            cleanups: Vec::new(),
        }
    }

    /// Current view state
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.view.screen()
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&SessionId> {
        self.view.session()
    }

    /// Take all notifications raised since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, level: NotificationLevel, title: &str, message: impl Into<String>) {
        let notification = Notification {
            level,
            title: title.to_string(),
            message: message.into(),
        };
        tracing::debug!(?notification, "Notification raised");
        self.notifications.push_back(notification);
    }

    // ---------------------------------------------------------------------
    // Upload screen
    // ---------------------------------------------------------------------

    /// Append text to the paste buffer
    pub fn paste_text(&mut self, text: &str) -> Outcome {
        match &mut self.view {
            ViewState::Upload(view) => {
                view.paste_buffer.push_str(text);
                Outcome::Stayed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Empty the paste buffer
    pub fn clear_paste_buffer(&mut self) -> Outcome {
        match &mut self.view {
            ViewState::Upload(view) => {
                view.paste_buffer.clear();
                Outcome::Stayed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Handle a picked file
    ///
    /// PDFs start an upload (and disable further selection until it
    /// completes); other files are decoded into the paste buffer locally.
    pub fn select_file(&mut self, document: DocumentFile) -> FileSelection<A> {
        let ViewState::Upload(view) = &mut self.view else {
            tracing::debug!("File selected outside the upload screen, ignoring");
            return FileSelection::Ignored;
        };

        if view.is_uploading {
            tracing::debug!(name = %document.name(), "Upload already in flight, ignoring");
            return FileSelection::Ignored;
        }

        if document.is_pdf() {
            view.is_uploading = true;
            FileSelection::Pending(PendingUpload {
                api: Arc::clone(&self.api),
                document,
            })
        } else {
            tracing::info!(
                name = %document.name(),
                mime_type = %document.mime_type(),
                "Loading non-PDF document as text"
            );
            view.paste_buffer = document.decode_text();
            FileSelection::LoadedText
        }
    }

    /// Apply a finished upload
    pub fn complete_upload(&mut self, completed: CompletedUpload) -> Outcome {
        let CompletedUpload { document, result } = completed;

        let in_flight = matches!(&self.view, ViewState::Upload(view) if view.is_uploading);
        if !in_flight {
            // The user moved on; a session the server created is now orphaned.
            if let Some(session) = result
                .ok()
                .and_then(|reply| SessionId::new(reply.session_id))
            {
                tracing::info!(session_id = %session, "Discarding upload that finished too late");
                self.spawn_cleanup(session);
            }
            return Outcome::Ignored;
        }

        let session = result.and_then(|reply| {
            SessionId::new(reply.session_id).ok_or_else(|| {
                QuicknoteError::Upload("Upload response did not include a session id".to_string())
                    .into()
            })
        });

        match session {
            Ok(session) => {
                tracing::info!(
                    session_id = %session,
                    name = %document.name(),
                    "Document uploaded"
                );
                self.view = ViewState::DocumentChat(DocumentChatView {
                    session,
                    pagination: Pagination::new(document.page_count()),
                    document,
                    prompt: String::new(),
                    is_sending: false,
                });
                self.notify(
                    NotificationLevel::Success,
                    "Success",
                    "PDF uploaded and processed successfully!",
                );
                Outcome::Moved {
                    from: Screen::Upload,
                    to: Screen::DocumentChat,
                }
            }
            Err(e) => {
                tracing::warn!("Upload failed: {}", e);
                if let ViewState::Upload(view) = &mut self.view {
                    view.is_uploading = false;
                }
                self.notify(NotificationLevel::Error, "Upload Error", user_message(&e));
                Outcome::Stayed
            }
        }
    }

    /// Select a file and, for PDFs, wait for the upload to finish
    pub async fn open_file(&mut self, document: DocumentFile) -> Outcome {
        match self.select_file(document) {
            FileSelection::Ignored => Outcome::Ignored,
            FileSelection::LoadedText => Outcome::Stayed,
            FileSelection::Pending(pending) => {
                let completed = pending.run().await;
                self.complete_upload(completed)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Document screen
    // ---------------------------------------------------------------------

    /// Replace the prompt box content (disabled while sending)
    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Outcome {
        match &mut self.view {
            ViewState::DocumentChat(view) if !view.is_sending => {
                view.prompt = prompt.into();
                Outcome::Stayed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Start sending the current prompt
    ///
    /// Returns `None` (and changes nothing) when there is no session, the
    /// prompt is blank, or a send is already in flight.
    pub fn submit_prompt(&mut self) -> Option<PendingSend<A>> {
        let ViewState::DocumentChat(view) = &mut self.view else {
            return None;
        };
        if !view.can_send() {
            tracing::debug!(is_sending = view.is_sending, "Prompt not sendable, ignoring");
            return None;
        }

        view.is_sending = true;
        Some(PendingSend {
            api: Arc::clone(&self.api),
            session: view.session.clone(),
            prompt: view.prompt.clone(),
        })
    }

    /// Apply a finished chat request
    pub fn complete_send(&mut self, completed: CompletedSend) -> Outcome {
        let CompletedSend {
            session,
            prompt,
            result,
        } = completed;

        match std::mem::take(&mut self.view) {
            ViewState::DocumentChat(mut view) if view.is_sending && view.session == session => {
                view.is_sending = false;
                match result {
                    Ok(reply) => {
                        if reply.session_id != session.as_str() {
                            tracing::warn!(
                                expected = %session,
                                received = %reply.session_id,
                                "Chat reply names a different session"
                            );
                        }
                        tracing::info!(
                            session_id = %session,
                            answer_chars = reply.answer.chars().count(),
                            "Answer received"
                        );
                        self.view = ViewState::Answer(AnswerView {
                            document: view,
                            submitted_prompt: prompt,
                            answer: Some(reply.answer).filter(|a| !a.is_empty()),
                            reveal_cancel: CancellationToken::new(),
                            reveal_taken: false,
                        });
                        Outcome::Moved {
                            from: Screen::DocumentChat,
                            to: Screen::Answer,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %session, "Chat request failed: {}", e);
                        self.view = ViewState::DocumentChat(view);
                        self.notify(NotificationLevel::Error, "Chat Error", user_message(&e));
                        Outcome::Stayed
                    }
                }
            }
            other => {
                tracing::debug!(session_id = %session, "Discarding chat reply for a screen that was left");
                self.view = other;
                Outcome::Ignored
            }
        }
    }

    /// Submit the current prompt and wait for the answer
    pub async fn send_prompt(&mut self) -> Outcome {
        match self.submit_prompt() {
            Some(pending) => {
                let completed = pending.run().await;
                self.complete_send(completed)
            }
            None => Outcome::Ignored,
        }
    }

    /// Show the next preview page
    pub fn next_page(&mut self) -> Outcome {
        match &mut self.view {
            ViewState::DocumentChat(view) => {
                view.pagination.next();
                Outcome::Stayed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Show the previous preview page
    pub fn previous_page(&mut self) -> Outcome {
        match &mut self.view {
            ViewState::DocumentChat(view) => {
                view.pagination.previous();
                Outcome::Stayed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Leave the document, deleting its session in the background
    pub fn back_to_upload(&mut self) -> Outcome {
        match std::mem::take(&mut self.view) {
            ViewState::DocumentChat(view) => {
                tracing::info!(session_id = %view.session, "Closing document");
                self.spawn_cleanup(view.session);
                Outcome::Moved {
                    from: Screen::DocumentChat,
                    to: Screen::Upload,
                }
            }
            other => {
                self.view = other;
                Outcome::Ignored
            }
        }
    }

    /// Fetch the session's chat history
    ///
    /// Failures are raised as a notification and yield `None`.
    pub async fn history(&mut self) -> Option<ChatHistoryResponse> {
        let session = self.view.session()?.clone();
        match self.api.get_chat_history(session.as_str()).await {
            Ok(history) => Some(history),
            Err(e) => {
                tracing::warn!(session_id = %session, "History request failed: {}", e);
                self.notify(NotificationLevel::Error, "History Error", user_message(&e));
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Answer screen
    // ---------------------------------------------------------------------

    /// Hand out the reveal for the current answer, once
    ///
    /// The reveal is cancelled as soon as the answer screen is left.
    pub fn take_reveal(&mut self) -> Option<Reveal> {
        let ViewState::Answer(view) = &mut self.view else {
            return None;
        };
        if view.reveal_taken {
            return None;
        }
        view.reveal_taken = true;
        Some(Reveal::new(
            view.answer.as_deref(),
            &self.reveal_config,
            view.reveal_cancel.clone(),
        ))
    }

    /// Return to the document with the prompt kept
    pub fn back_to_document(&mut self) -> Outcome {
        self.leave_answer(false)
    }

    /// Return to the document with an empty prompt
    pub fn ask_another_question(&mut self) -> Outcome {
        self.leave_answer(true)
    }

    /// Drop the document from the answer screen and start over
    pub fn start_new_analysis(&mut self) -> Outcome {
        match std::mem::take(&mut self.view) {
            ViewState::Answer(view) => {
                view.reveal_cancel.cancel();
                self.spawn_cleanup(view.document.session);
                Outcome::Moved {
                    from: Screen::Answer,
                    to: Screen::Upload,
                }
            }
            other => {
                self.view = other;
                Outcome::Ignored
            }
        }
    }

    fn leave_answer(&mut self, clear_prompt: bool) -> Outcome {
        match std::mem::take(&mut self.view) {
            ViewState::Answer(view) => {
                view.reveal_cancel.cancel();
                let mut document = view.document;
                if clear_prompt {
                    document.prompt.clear();
                }
                self.view = ViewState::DocumentChat(document);
                Outcome::Moved {
                    from: Screen::Answer,
                    to: Screen::DocumentChat,
                }
            }
            other => {
                self.view = other;
                Outcome::Ignored
            }
        }
    }

    // ---------------------------------------------------------------------
    // Cleanup
    // ---------------------------------------------------------------------

    /// Delete a session without waiting; failures only reach the log
    fn spawn_cleanup(&mut self, session: SessionId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(session_id = %session, "No async runtime, session left on server");
            return;
        };

        self.cleanups.retain(|handle| !handle.is_finished());
        let api = Arc::clone(&self.api);
        self.cleanups.push(runtime.spawn(async move {
            match api.delete_session(session.as_str()).await {
                Ok(reply) => {
                    tracing::debug!(session_id = %session, message = %reply.message, "Session deleted");
                }
                Err(e) => {
                    let error = QuicknoteError::Cleanup(user_message(&e));
                    tracing::warn!(session_id = %session, "{}", error);
                }
            }
        }));
    }

    /// Wait for every background session deletion started so far
    pub async fn flush_cleanups(&mut self) {
        let handles: Vec<JoinHandle<()>> = self.cleanups.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Session cleanup task failed: {}", e);
            }
        }
    }

    /// End the session: stop any reveal, optionally delete the active
    /// session, and wait for pending deletions
    pub async fn shutdown(mut self, delete_session: bool) {
        if let ViewState::Answer(view) = &self.view {
            view.reveal_cancel.cancel();
        }
        if delete_session {
            if let Some(session) = self.view.session().cloned() {
                self.spawn_cleanup(session);
            }
        }
        self.flush_cleanups().await;
    }
}

impl<A: ?Sized> Drop for SessionController<A> {
    fn drop(&mut self) {
        if let ViewState::Answer(view) = &self.view {
            view.reveal_cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSummaryApi;
    use futures::StreamExt;

    fn pdf() -> DocumentFile {
        DocumentFile::from_bytes(
            "paper.pdf",
            b"%PDF-1.4\n<< /Type /Page >>\n<< /Type /Page >>\n".to_vec(),
        )
    }

    fn controller(api: FakeSummaryApi) -> (SessionController<FakeSummaryApi>, Arc<FakeSummaryApi>) {
        let api = Arc::new(api);
        let reveal = RevealConfig {
            enabled: true,
            step_delay_ms: 1,
            chars_per_step: 1,
        };
        (SessionController::new(Arc::clone(&api), reveal), api)
    }

    async fn on_document(
        api: FakeSummaryApi,
    ) -> (SessionController<FakeSummaryApi>, Arc<FakeSummaryApi>) {
        let (mut c, api) = controller(api);
        c.open_file(pdf()).await;
        assert_eq!(c.screen(), Screen::DocumentChat);
        c.drain_notifications();
        (c, api)
    }

    #[tokio::test]
    async fn test_duplicate_upload_ignored_while_in_flight() {
        let (mut c, api) = controller(FakeSummaryApi::new());

        let FileSelection::Pending(pending) = c.select_file(pdf()) else {
            panic!("expected pending upload");
        };
        assert!(matches!(&c.view, ViewState::Upload(v) if v.is_uploading));
        assert!(matches!(c.select_file(pdf()), FileSelection::Ignored));

        let outcome = c.complete_upload(pending.run().await);
        assert_eq!(
            outcome,
            Outcome::Moved {
                from: Screen::Upload,
                to: Screen::DocumentChat
            }
        );
        assert_eq!(api.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_upload_sets_page_count() {
        let (c, _) = on_document(FakeSummaryApi::new()).await;
        let ViewState::DocumentChat(view) = c.view() else {
            panic!("expected document view");
        };
        assert_eq!(view.pagination.num_pages(), 2);
        assert_eq!(view.pagination.page(), 1);
    }

    #[tokio::test]
    async fn test_blank_session_id_is_upload_error() {
        let (mut c, _) = controller(FakeSummaryApi::new().with_session_id(""));
        assert_eq!(c.open_file(pdf()).await, Outcome::Stayed);
        assert_eq!(c.screen(), Screen::Upload);
        let notes = c.drain_notifications();
        assert_eq!(notes[0].title, "Upload Error");
        assert!(matches!(&c.view, ViewState::Upload(v) if !v.is_uploading));
    }

    #[tokio::test]
    async fn test_non_pdf_fills_paste_buffer() {
        let (mut c, api) = controller(FakeSummaryApi::new());
        c.paste_text("old text");
        let txt = DocumentFile::from_bytes("notes.txt", b"decoded".to_vec());

        assert_eq!(c.open_file(txt).await, Outcome::Stayed);
        assert!(matches!(&c.view, ViewState::Upload(v) if v.paste_buffer == "decoded"));
        assert_eq!(api.upload_count(), 0);
        assert!(c.session().is_none());
    }

    #[tokio::test]
    async fn test_late_upload_after_leaving_is_cleaned_up() {
        let (mut c, api) = controller(FakeSummaryApi::new().with_session_id("first"));
        let FileSelection::Pending(pending) = c.select_file(pdf()) else {
            panic!("expected pending upload");
        };
        let completed = pending.run().await;

        // Simulate the upload screen being reset while the request was out.
        c.view = ViewState::default();
        assert_eq!(c.complete_upload(completed), Outcome::Ignored);
        c.flush_cleanups().await;
        assert_eq!(api.delete_count(), 1);
        assert!(c.session().is_none());
    }

    #[tokio::test]
    async fn test_send_in_flight_blocks_second_send_and_prompt_edits() {
        let (mut c, api) = on_document(FakeSummaryApi::new()).await;
        c.set_prompt("Summarize");

        let pending = c.submit_prompt().unwrap();
        assert_eq!(pending.prompt(), "Summarize");
        assert!(c.submit_prompt().is_none());
        assert_eq!(c.set_prompt("changed"), Outcome::Ignored);

        c.complete_send(pending.run().await);
        assert_eq!(c.screen(), Screen::Answer);
        assert_eq!(api.chat_count(), 1);
    }

    #[tokio::test]
    async fn test_chat_failure_stays_on_document() {
        let (mut c, _) = on_document(FakeSummaryApi::new().failing_chat("Session not found")).await;
        c.set_prompt("Summarize");

        assert_eq!(c.send_prompt().await, Outcome::Stayed);
        assert_eq!(c.screen(), Screen::DocumentChat);
        let notes = c.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].title, "Chat Error");
        assert_eq!(notes[0].message, "Session not found");
        assert!(matches!(&c.view, ViewState::DocumentChat(v) if !v.is_sending));
    }

    #[tokio::test]
    async fn test_reply_after_back_is_discarded() {
        let (mut c, _) = on_document(FakeSummaryApi::new()).await;
        c.set_prompt("Summarize");
        let pending = c.submit_prompt().unwrap();

        c.back_to_upload();
        assert_eq!(c.complete_send(pending.run().await), Outcome::Ignored);
        assert_eq!(c.screen(), Screen::Upload);
        c.flush_cleanups().await;
    }

    #[tokio::test]
    async fn test_back_to_document_keeps_prompt() {
        let (mut c, _) = on_document(FakeSummaryApi::new()).await;
        c.set_prompt("Summarize");
        c.send_prompt().await;

        assert_eq!(
            c.back_to_document(),
            Outcome::Moved {
                from: Screen::Answer,
                to: Screen::DocumentChat
            }
        );
        assert!(matches!(&c.view, ViewState::DocumentChat(v) if v.prompt == "Summarize"));
    }

    #[tokio::test]
    async fn test_reveal_handed_out_once_and_cancelled_on_leave() {
        let (mut c, _) = on_document(FakeSummaryApi::new().with_answer("a long enough answer")).await;
        c.set_prompt("Summarize");
        c.send_prompt().await;

        let reveal = c.take_reveal().unwrap();
        assert!(c.take_reveal().is_none());

        let mut stream = reveal.into_stream();
        assert_eq!(stream.next().await.unwrap().prefix(), "a");
        c.ask_another_question();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_answer_reveals_fallback() {
        let (mut c, _) = on_document(FakeSummaryApi::new().with_answer("")).await;
        c.set_prompt("Summarize");
        c.send_prompt().await;
        assert_eq!(c.screen(), Screen::Answer);
        assert!(c.take_reveal().unwrap().is_fallback());
    }

    #[tokio::test]
    async fn test_start_new_analysis_deletes_session() {
        let (mut c, api) = on_document(FakeSummaryApi::new()).await;
        c.set_prompt("Summarize");
        c.send_prompt().await;

        assert_eq!(
            c.start_new_analysis(),
            Outcome::Moved {
                from: Screen::Answer,
                to: Screen::Upload
            }
        );
        c.flush_cleanups().await;
        assert_eq!(api.delete_count(), 1);
        assert!(c.session().is_none());
    }

    #[tokio::test]
    async fn test_actions_ignored_on_wrong_screen() {
        let (mut c, api) = controller(FakeSummaryApi::new());
        assert_eq!(c.next_page(), Outcome::Ignored);
        assert_eq!(c.set_prompt("x"), Outcome::Ignored);
        assert_eq!(c.back_to_document(), Outcome::Ignored);
        assert_eq!(c.ask_another_question(), Outcome::Ignored);
        assert_eq!(c.start_new_analysis(), Outcome::Ignored);
        assert!(c.take_reveal().is_none());
        assert!(c.history().await.is_none());
        assert!(api.calls().is_empty());

        let (mut c, _) = on_document(FakeSummaryApi::new()).await;
        assert_eq!(c.paste_text("x"), Outcome::Ignored);
        assert_eq!(c.clear_paste_buffer(), Outcome::Ignored);
        assert!(matches!(c.select_file(pdf()), FileSelection::Ignored));
    }

    #[tokio::test]
    async fn test_history_uses_active_session() {
        let (mut c, api) = on_document(FakeSummaryApi::new().with_answer("A")).await;
        c.set_prompt("Q");
        c.send_prompt().await;

        let history = c.history().await.unwrap();
        assert_eq!(history.messages.len(), 2);
        assert!(api.calls().contains(&crate::api::fake::ApiCall::History {
            session_id: "fake-session".to_string()
        }));
    }

    #[tokio::test]
    async fn test_shutdown_deletes_active_session() {
        let (c, api) = on_document(FakeSummaryApi::new()).await;
        c.shutdown(true).await;
        assert_eq!(api.delete_count(), 1);

        let (c, api) = on_document(FakeSummaryApi::new()).await;
        c.shutdown(false).await;
        assert_eq!(api.delete_count(), 0);
    }

    #[test]
    fn test_back_without_runtime_does_not_panic() {
        let api = Arc::new(FakeSummaryApi::new());
        let mut c = SessionController::new(Arc::clone(&api), RevealConfig::default());
        c.view = ViewState::DocumentChat(DocumentChatView {
            session: SessionId::new("s").unwrap(),
            document: pdf(),
            pagination: Pagination::new(1),
            prompt: String::new(),
            is_sending: false,
        });
        assert_eq!(c.screen(), Screen::DocumentChat);
        c.back_to_upload();
        assert_eq!(c.screen(), Screen::Upload);
        assert_eq!(api.delete_count(), 0);
    }
}
