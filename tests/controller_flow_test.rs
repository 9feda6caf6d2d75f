//! End-to-end controller flows
//!
//! Drives `SessionController` through the upload → document → answer
//! screens, once against a wiremock backend through the real HTTP client and
//! otherwise against the in-process fake.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quicknote::api::fake::{ApiCall, FakeSummaryApi};
use quicknote::api::{HttpSummaryApi, SummaryApi};
use quicknote::config::{ApiConfig, RevealConfig};
use quicknote::document::DocumentFile;
use quicknote::reveal::RevealFrame;
use quicknote::view::{NotificationLevel, Outcome, Screen, SessionController, ViewState};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fast_reveal() -> RevealConfig {
    RevealConfig {
        enabled: true,
        step_delay_ms: 1,
        chars_per_step: 3,
    }
}

fn pdf(pages: usize) -> DocumentFile {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    for _ in 0..pages {
        bytes.extend_from_slice(b"<< /Type /Page >>\n");
    }
    DocumentFile::from_bytes("paper.pdf", bytes)
}

fn controller_with(api: FakeSummaryApi) -> (SessionController<FakeSummaryApi>, Arc<FakeSummaryApi>) {
    let api = Arc::new(api);
    (SessionController::new(Arc::clone(&api), fast_reveal()), api)
}

async fn uploaded(api: FakeSummaryApi) -> (SessionController<FakeSummaryApi>, Arc<FakeSummaryApi>) {
    let (mut controller, api) = controller_with(api);
    controller.open_file(pdf(3)).await;
    controller.drain_notifications();
    (controller, api)
}

fn prompt_of(view: &ViewState) -> &str {
    match view {
        ViewState::DocumentChat(v) => &v.prompt,
        other => panic!("expected document screen, got {}", other.screen()),
    }
}

// ---------------------------------------------------------------------------
// Scenarios against the HTTP backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_upload_then_answer_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc123",
            "filename": "paper.pdf",
            "message": "ok"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "This paper shows...",
            "session_id": "abc123"
        })))
        .mount(&server)
        .await;

    let api: Arc<dyn SummaryApi> = Arc::new(
        HttpSummaryApi::new(&ApiConfig {
            base_url: format!("{}/api", server.uri()),
            ..ApiConfig::default()
        })
        .unwrap(),
    );
    let mut controller = SessionController::new(api, fast_reveal());

    let outcome = controller.open_file(pdf(1)).await;
    assert_eq!(
        outcome,
        Outcome::Moved {
            from: Screen::Upload,
            to: Screen::DocumentChat
        }
    );
    assert_eq!(controller.session().unwrap().as_str(), "abc123");
    let notes = controller.drain_notifications();
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].message, "PDF uploaded and processed successfully!");

    controller.set_prompt("Summarize key points");
    controller.send_prompt().await;
    assert_eq!(controller.screen(), Screen::Answer);

    let frames: Vec<RevealFrame> = controller.take_reveal().unwrap().into_stream().collect().await;
    assert!(frames.len() > 1, "answer should be revealed in steps");
    for pair in frames.windows(2) {
        assert!(pair[1].prefix().starts_with(pair[0].prefix()));
    }
    assert_eq!(frames.last().unwrap().prefix(), "This paper shows...");
}

#[tokio::test]
async fn test_upload_413_stays_on_upload_with_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(413).set_body_json(json!({"error": "file too large"})))
        .mount(&server)
        .await;

    let api = Arc::new(
        HttpSummaryApi::new(&ApiConfig {
            base_url: format!("{}/api", server.uri()),
            ..ApiConfig::default()
        })
        .unwrap(),
    );
    let mut controller = SessionController::new(api, fast_reveal());

    assert_eq!(controller.open_file(pdf(1)).await, Outcome::Stayed);
    assert_eq!(controller.screen(), Screen::Upload);
    assert!(controller.session().is_none());

    let notes = controller.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Upload Error");
    assert_eq!(notes[0].message, "file too large");
}

// ---------------------------------------------------------------------------
// Properties against the fake
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_only_pdfs_reach_the_upload_endpoint() {
    let (mut controller, api) = controller_with(FakeSummaryApi::new());

    for name in ["notes.txt", "draft.md", "report.docx", "blob"] {
        let doc = DocumentFile::from_bytes(name, b"some text".to_vec());
        controller.open_file(doc).await;
        assert_eq!(controller.screen(), Screen::Upload);
        assert!(controller.session().is_none());
    }
    assert_eq!(api.upload_count(), 0);

    controller.open_file(pdf(1)).await;
    assert_eq!(api.upload_count(), 1);
    assert!(!controller.session().unwrap().as_str().is_empty());
}

#[tokio::test]
async fn test_blank_prompt_is_a_no_op() {
    let (mut controller, api) = uploaded(FakeSummaryApi::new()).await;

    for prompt in ["", "   ", "\n\t"] {
        controller.set_prompt(prompt);
        assert_eq!(controller.send_prompt().await, Outcome::Ignored);
        assert_eq!(controller.screen(), Screen::DocumentChat);
    }
    assert_eq!(api.chat_count(), 0);
}

#[tokio::test]
async fn test_send_without_session_is_a_no_op() {
    let (mut controller, api) = controller_with(FakeSummaryApi::new());
    controller.set_prompt("Summarize");
    assert_eq!(controller.send_prompt().await, Outcome::Ignored);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_ask_another_clears_prompt_and_keeps_session() {
    let (mut controller, _) = uploaded(FakeSummaryApi::new()).await;
    let session = controller.session().cloned().unwrap();

    controller.set_prompt("Summarize key points");
    controller.send_prompt().await;
    assert_eq!(
        controller.ask_another_question(),
        Outcome::Moved {
            from: Screen::Answer,
            to: Screen::DocumentChat
        }
    );

    assert_eq!(prompt_of(controller.view()), "");
    assert_eq!(controller.session(), Some(&session));
}

#[tokio::test]
async fn test_repeated_back_deletes_session_once() {
    let (mut controller, api) = uploaded(FakeSummaryApi::new()).await;

    assert_eq!(
        controller.back_to_upload(),
        Outcome::Moved {
            from: Screen::DocumentChat,
            to: Screen::Upload
        }
    );
    assert_eq!(controller.back_to_upload(), Outcome::Ignored);
    assert_eq!(controller.back_to_upload(), Outcome::Ignored);
    controller.flush_cleanups().await;

    assert_eq!(api.delete_count(), 1);
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn test_failed_cleanup_is_silent() {
    let (mut controller, api) = uploaded(FakeSummaryApi::new().failing_delete("boom")).await;

    controller.back_to_upload();
    controller.flush_cleanups().await;

    assert_eq!(api.delete_count(), 1);
    assert_eq!(controller.screen(), Screen::Upload);
    assert!(controller.drain_notifications().is_empty());
}

#[tokio::test]
async fn test_pagination_clamps_through_controller() {
    let (mut controller, _) = uploaded(FakeSummaryApi::new()).await;
    let page = |c: &SessionController<FakeSummaryApi>| match c.view() {
        ViewState::DocumentChat(v) => v.pagination.page(),
        _ => panic!("expected document screen"),
    };

    controller.previous_page();
    assert_eq!(page(&controller), 1);
    for _ in 0..5 {
        controller.next_page();
    }
    assert_eq!(page(&controller), 3);
}

#[tokio::test]
async fn test_chat_error_notification_and_retry() {
    let (mut controller, api) = uploaded(FakeSummaryApi::new().failing_chat("LLM unavailable")).await;
    controller.set_prompt("Summarize");

    assert_eq!(controller.send_prompt().await, Outcome::Stayed);
    let notes = controller.drain_notifications();
    assert_eq!(notes[0].title, "Chat Error");
    assert_eq!(notes[0].message, "LLM unavailable");

    // The prompt survives so the user can retry as-is.
    assert_eq!(prompt_of(controller.view()), "Summarize");
    assert_eq!(controller.send_prompt().await, Outcome::Stayed);
    assert_eq!(api.chat_count(), 2);
}

#[tokio::test]
async fn test_leaving_answer_stops_reveal() {
    let (mut controller, _) =
        uploaded(FakeSummaryApi::new().with_answer("x".repeat(300))).await;
    controller.set_prompt("Summarize");
    controller.send_prompt().await;

    let mut frames = controller.take_reveal().unwrap().into_stream();
    frames.next().await.unwrap();
    controller.back_to_document();

    assert!(frames.next().await.is_none());
    assert_eq!(prompt_of(controller.view()), "Summarize");
}

#[tokio::test]
async fn test_history_after_two_questions() {
    let (mut controller, api) = uploaded(FakeSummaryApi::new().with_answer("A")).await;

    controller.set_prompt("Q1");
    controller.send_prompt().await;
    controller.ask_another_question();
    controller.set_prompt("Q2");
    controller.send_prompt().await;

    let history = controller.history().await.unwrap();
    let contents: Vec<&str> = history.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["Q1", "A", "Q2", "A"]);
    assert_eq!(
        api.calls().last(),
        Some(&ApiCall::History {
            session_id: "fake-session".to_string()
        })
    );
}
