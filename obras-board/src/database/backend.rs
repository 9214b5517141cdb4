//! `BoardBackend` over the SQLite repository

use super::models::Label;
use super::repository::Repository;
use crate::board::{Board, BoardBackend};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
impl BoardBackend for Repository {
    async fn fetch_board(&self, work_site_id: i64) -> Result<Board> {
        self.load_board(work_site_id).await
    }

    async fn move_card(&self, card_id: &str, destination_list_id: &str) -> Result<()> {
        self.move_card_to_top(card_id, destination_list_id).await?;
        Ok(())
    }

    async fn set_card_position(&self, card_id: &str, list_id: &str, position: f64) -> Result<()> {
        self.update_card_position(card_id, list_id, position).await?;
        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        Repository::list_labels(self).await
    }

    async fn add_label_to_card(&self, card_id: &str, label_id: &str) -> Result<()> {
        self.attach_label(card_id, label_id).await
    }

    async fn remove_label_from_card(&self, card_id: &str, label_id: &str) -> Result<()> {
        self.detach_label(card_id, label_id).await
    }

    async fn notify_card_completed(&self, work_site_id: i64, card_title: &str) {
        match self.record_completion(work_site_id, card_title).await {
            Ok(_) => tracing::info!("Completion recorded for card: {}", card_title),
            Err(e) => tracing::error!("Failed to record completion for {}: {}", card_title, e),
        }
    }
}
