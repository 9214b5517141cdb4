//! Board snapshot types
//!
//! A `Board` is the whole kanban structure of one work site as last
//! fetched: lists in display order, each holding its cards ordered by
//! ascending position together with their labels, checklists, comments
//! and attachments. Snapshots are replaced wholesale, never patched.

use crate::database::{Attachment, CardRow, ChecklistItem, ChecklistRow, Comment, Label, ListRow};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What moving a card into a list means for its status labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListRole {
    #[default]
    None,
    InProgress,
    Completed,
}

impl ListRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListRole::None => "none",
            ListRole::InProgress => "in_progress",
            ListRole::Completed => "completed",
        }
    }
}

impl fmt::Display for ListRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ListRole::None),
            "in_progress" => Ok(ListRole::InProgress),
            "completed" => Ok(ListRole::Completed),
            other => Err(AppError::Validation(format!("Unknown list role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub work_site_id: i64,
    pub name: String,
    pub lists: Vec<BoardList>,
}

impl Board {
    /// Board of a work site that has nothing stored yet
    pub fn empty(work_site_id: i64, name: impl Into<String>) -> Self {
        Self {
            work_site_id,
            name: name.into(),
            lists: Vec::new(),
        }
    }

    pub fn list(&self, list_id: &str) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub fn list_index(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|list| list.id == list_id)
    }

    /// Locate a card and the list currently holding it
    pub fn find_card(&self, card_id: &str) -> Option<(&BoardList, &Card)> {
        self.lists.iter().find_map(|list| {
            list.cards
                .iter()
                .find(|card| card.id == card_id)
                .map(|card| (list, card))
        })
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub role: ListRole,
    pub position: i64,
    pub cards: Vec<Card>,
}

impl BoardList {
    pub fn from_row(row: ListRow, cards: Vec<Card>) -> Self {
        let role = row.role.parse().unwrap_or_else(|e| {
            tracing::warn!("List {} has an unreadable role: {}", row.id, e);
            ListRole::None
        });

        Self {
            id: row.id,
            board_id: row.board_id,
            title: row.title,
            role,
            position: row.position,
            cards,
        }
    }

    pub fn positions(&self) -> Vec<f64> {
        self.cards.iter().map(|card| card.position).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    /// Ordering key within the list, ascending = earlier
    pub position: f64,
    pub labels: Vec<Label>,
    pub checklists: Vec<Checklist>,
    pub comments: Vec<Comment>,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// A card with no related collections loaded
    pub fn from_row(row: CardRow) -> Self {
        Self {
            id: row.id,
            list_id: row.list_id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            position: row.position,
            labels: Vec::new(),
            checklists: Vec::new(),
            comments: Vec::new(),
            attachments: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn has_label(&self, label_id: &str) -> bool {
        self.labels.iter().any(|label| label.id == label_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub card_id: String,
    pub title: String,
    pub position: i64,
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn from_row(row: ChecklistRow, items: Vec<ChecklistItem>) -> Self {
        Self {
            id: row.id,
            card_id: row.card_id,
            title: row.title,
            position: row.position,
            items,
        }
    }

    /// (checked, total)
    pub fn progress(&self) -> (usize, usize) {
        let checked = self.items.iter().filter(|item| item.checked).count();
        (checked, self.items.len())
    }
}
