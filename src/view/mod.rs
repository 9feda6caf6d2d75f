//! Screen state and the controller that drives it

pub mod controller;
pub mod state;

pub use controller::{
    CompletedSend, CompletedUpload, FileSelection, Notification, NotificationLevel, Outcome,
    PendingSend, PendingUpload, SessionController,
};
pub use state::{
    AnswerView, DocumentChatView, Pagination, Screen, SessionId, UploadView, ViewState,
};
