//! Error types for the board core
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Board not found for work site: {0}")]
    BoardNotFound(i64),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Checklist not found: {0}")]
    ChecklistNotFound(String),

    #[error("Checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Another drag operation is still in flight")]
    DragInProgress,

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
