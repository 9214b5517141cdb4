//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The board owned by one work site
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardRow {
    pub id: String,
    pub work_site_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A column of cards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListRow {
    pub id: String,
    pub board_id: String,
    pub title: String,
    /// Semantic role: "none", "in_progress" or "completed"
    pub role: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card without its related collections
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardRow {
    pub id: String,
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub position: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A checklist without its items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChecklistRow {
    pub id: String,
    pub card_id: String,
    pub title: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChecklistItem {
    pub id: String,
    pub checklist_id: String,
    pub title: String,
    pub position: i64,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
}

/// Board-wide colored tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub id: String,
    pub title: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Label joined with the card carrying it
#[derive(Debug, Clone, FromRow)]
pub struct CardLabelRow {
    pub card_id: String,
    pub id: String,
    pub title: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<CardLabelRow> for Label {
    fn from(row: CardLabelRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: String,
    pub card_id: String,
    pub content: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Attachment metadata; the file itself lives in external storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: String,
    pub card_id: String,
    pub filename: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Record left by the completion side-channel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletionNotification {
    pub id: String,
    pub work_site_id: i64,
    pub card_title: String,
    pub created_at: DateTime<Utc>,
}

/// Create card request
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Update card request
///
/// `None` leaves a field untouched. For the nullable fields `Some(None)`
/// clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Attachment metadata to record
#[derive(Debug, Deserialize)]
pub struct CreateAttachmentRequest {
    pub card_id: String,
    pub filename: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub size: i64,
}
