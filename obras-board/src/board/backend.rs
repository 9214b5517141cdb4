//! Contract with the data collaborator
//!
//! The board core never talks to storage directly; everything goes
//! through these operations. `database::Repository` implements them
//! over SQLite.

use super::model::Board;
use crate::database::Label;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// Full snapshot of a work site's board
    async fn fetch_board(&self, work_site_id: i64) -> Result<Board>;

    /// Reassign a card to another list
    async fn move_card(&self, card_id: &str, destination_list_id: &str) -> Result<()>;

    /// Store a card's list and ordering key
    async fn set_card_position(&self, card_id: &str, list_id: &str, position: f64) -> Result<()>;

    /// Board-wide label catalog
    async fn list_labels(&self) -> Result<Vec<Label>>;

    async fn add_label_to_card(&self, card_id: &str, label_id: &str) -> Result<()>;

    async fn remove_label_from_card(&self, card_id: &str, label_id: &str) -> Result<()>;

    /// Fire-and-forget; implementations log their own failures.
    async fn notify_card_completed(&self, work_site_id: i64, card_title: &str);
}
