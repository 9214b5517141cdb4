//! Repository layer for database operations
//!
//! CRUD operations for boards, lists, cards and everything hanging off a
//! card, plus assembly of whole board snapshots.

use super::models::*;
use crate::board::position::{after_last, renumbered_positions};
use crate::board::rules::infer_list_role;
use crate::board::{Board, BoardList, Card, Checklist, ListRole};
use crate::config::{DEFAULT_BOARD_NAME, EMPTY_LIST_POSITION};
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// Group rows by the id of their owner, keeping row order
fn group_by<T>(rows: Vec<T>, owner: impl Fn(&T) -> &str) -> HashMap<String, Vec<T>> {
    let mut groups: HashMap<String, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(owner(&row).to_string()).or_default().push(row);
    }
    groups
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Boards =====

    pub async fn get_board_row(&self, work_site_id: i64) -> Result<Option<BoardRow>> {
        let board = sqlx::query_as::<_, BoardRow>("SELECT * FROM boards WHERE work_site_id = ?")
            .bind(work_site_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(board)
    }

    /// Board of a work site, created on first use
    pub async fn ensure_board(&self, work_site_id: i64) -> Result<BoardRow> {
        if let Some(board) = self.get_board_row(work_site_id).await? {
            return Ok(board);
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO boards (id, work_site_id, name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(work_site_id)
        .bind(DEFAULT_BOARD_NAME)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created board for work site: {}", work_site_id);

        self.get_board_row(work_site_id)
            .await?
            .ok_or(AppError::BoardNotFound(work_site_id))
    }

    /// Assemble the full snapshot of a work site's board.
    ///
    /// A work site without a stored board yields an empty board.
    pub async fn load_board(&self, work_site_id: i64) -> Result<Board> {
        let Some(board) = self.get_board_row(work_site_id).await? else {
            return Ok(Board::empty(work_site_id, DEFAULT_BOARD_NAME));
        };

        let lists = sqlx::query_as::<_, ListRow>(
            "SELECT * FROM lists WHERE board_id = ? ORDER BY position ASC, created_at ASC",
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let cards = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT c.* FROM cards c
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY c.position ASC, c.created_at ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let labels = sqlx::query_as::<_, CardLabelRow>(
            r#"
            SELECT cl.card_id, lb.id, lb.title, lb.color, lb.created_at
            FROM card_labels cl
            JOIN labels lb ON lb.id = cl.label_id
            JOIN cards c ON c.id = cl.card_id
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY cl.created_at ASC, lb.title ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let checklists = sqlx::query_as::<_, ChecklistRow>(
            r#"
            SELECT ch.* FROM checklists ch
            JOIN cards c ON c.id = ch.card_id
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY ch.position ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT i.* FROM checklist_items i
            JOIN checklists ch ON ch.id = i.checklist_id
            JOIN cards c ON c.id = ch.card_id
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY i.position ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT co.* FROM comments co
            JOIN cards c ON c.id = co.card_id
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY co.created_at ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let attachments = sqlx::query_as::<_, Attachment>(
            r#"
            SELECT a.* FROM attachments a
            JOIN cards c ON c.id = a.card_id
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(&board.id)
        .fetch_all(&self.pool)
        .await?;

        let mut labels = group_by(labels, |row| row.card_id.as_str());
        let mut items = group_by(items, |item| item.checklist_id.as_str());
        let mut checklists = group_by(checklists, |checklist| checklist.card_id.as_str());
        let mut comments = group_by(comments, |comment| comment.card_id.as_str());
        let mut attachments = group_by(attachments, |attachment| attachment.card_id.as_str());

        let cards: Vec<Card> = cards
            .into_iter()
            .map(|row| {
                let mut card = Card::from_row(row);
                card.labels = labels
                    .remove(&card.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Label::from)
                    .collect();
                card.checklists = checklists
                    .remove(&card.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|checklist| {
                        let items = items.remove(&checklist.id).unwrap_or_default();
                        Checklist::from_row(checklist, items)
                    })
                    .collect();
                card.comments = comments.remove(&card.id).unwrap_or_default();
                card.attachments = attachments.remove(&card.id).unwrap_or_default();
                card
            })
            .collect();

        let mut cards = group_by(cards, |card| card.list_id.as_str());

        let lists = lists
            .into_iter()
            .map(|row| {
                let cards = cards.remove(&row.id).unwrap_or_default();
                BoardList::from_row(row, cards)
            })
            .collect();

        Ok(Board {
            work_site_id,
            name: board.name,
            lists,
        })
    }

    // ===== Lists =====

    pub async fn get_list(&self, id: &str) -> Result<ListRow> {
        sqlx::query_as::<_, ListRow>("SELECT * FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ListNotFound(id.to_string()))
    }

    /// Append a list to the work site's board
    pub async fn create_list(&self, work_site_id: i64, title: &str, role: ListRole) -> Result<ListRow> {
        let board = self.ensure_board(work_site_id).await?;

        let last: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM lists WHERE board_id = ?")
            .bind(&board.id)
            .fetch_one(&self.pool)
            .await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let list = sqlx::query_as::<_, ListRow>(
            r#"
            INSERT INTO lists (id, board_id, title, role, position, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&board.id)
        .bind(title)
        .bind(role.as_str())
        .bind(last.map_or(0, |p| p + 1))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created list: {} ({})", id, title);
        Ok(list)
    }

    /// Create the given lists, in order, on a board that has none.
    ///
    /// Returns nothing when the board already has lists.
    pub async fn create_default_lists(&self, work_site_id: i64, titles: &[String]) -> Result<Vec<ListRow>> {
        let board = self.ensure_board(work_site_id).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lists WHERE board_id = ?")
            .bind(&board.id)
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            return Ok(Vec::new());
        }

        let mut created = Vec::with_capacity(titles.len());
        for title in titles {
            created.push(self.create_list(work_site_id, title, infer_list_role(title)).await?);
        }

        tracing::info!("Created {} default lists for work site {}", created.len(), work_site_id);
        Ok(created)
    }

    pub async fn rename_list(&self, id: &str, title: &str) -> Result<ListRow> {
        let rows = sqlx::query("UPDATE lists SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ListNotFound(id.to_string()));
        }

        self.get_list(id).await
    }

    pub async fn set_list_role(&self, id: &str, role: ListRole) -> Result<ListRow> {
        let rows = sqlx::query("UPDATE lists SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ListNotFound(id.to_string()));
        }

        self.get_list(id).await
    }

    /// Delete a list and, through the foreign keys, its cards
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ListNotFound(id.to_string()));
        }

        tracing::debug!("Deleted list: {}", id);
        Ok(())
    }

    // ===== Cards =====

    pub async fn get_card(&self, id: &str) -> Result<CardRow> {
        sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::CardNotFound(id.to_string()))
    }

    /// Create a card after the last card of its list
    pub async fn create_card(&self, req: CreateCardRequest) -> Result<CardRow> {
        self.get_list(&req.list_id).await?;

        let last: Option<f64> = sqlx::query_scalar("SELECT MAX(position) FROM cards WHERE list_id = ?")
            .bind(&req.list_id)
            .fetch_one(&self.pool)
            .await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let card = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO cards (id, list_id, title, description, due_date, position, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.list_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.due_date)
        .bind(after_last(last))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created card: {} in list: {}", id, req.list_id);
        Ok(card)
    }

    pub async fn update_card(&self, req: UpdateCardRequest) -> Result<CardRow> {
        let (set_description, description) = match req.description {
            Some(description) => (true, description),
            None => (false, None),
        };
        let (set_due_date, due_date) = match req.due_date {
            Some(due_date) => (true, due_date),
            None => (false, None),
        };

        let rows = sqlx::query(
            r#"
            UPDATE cards SET
                title = COALESCE(?, title),
                description = CASE WHEN ? THEN ? ELSE description END,
                due_date = CASE WHEN ? THEN ? ELSE due_date END,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.title)
        .bind(set_description)
        .bind(description)
        .bind(set_due_date)
        .bind(due_date)
        .bind(Utc::now())
        .bind(&req.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::CardNotFound(req.id));
        }

        self.get_card(&req.id).await
    }

    /// Delete a card with its checklists, comments, attachments and label links
    pub async fn delete_card(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::CardNotFound(id.to_string()));
        }

        tracing::debug!("Deleted card: {}", id);
        Ok(())
    }

    /// Put a card on top of another list: half the first position there,
    /// or the empty-list position.
    pub async fn move_card_to_top(&self, card_id: &str, list_id: &str) -> Result<CardRow> {
        self.get_list(list_id).await?;

        let first: Option<f64> =
            sqlx::query_scalar("SELECT MIN(position) FROM cards WHERE list_id = ? AND id != ?")
                .bind(list_id)
                .bind(card_id)
                .fetch_one(&self.pool)
                .await?;

        let position = first.map_or(EMPTY_LIST_POSITION, |p| p / 2.0);
        self.update_card_position(card_id, list_id, position).await
    }

    /// Store a card's list and position
    pub async fn update_card_position(&self, card_id: &str, list_id: &str, position: f64) -> Result<CardRow> {
        self.get_card(card_id).await?;
        self.get_list(list_id).await?;

        sqlx::query("UPDATE cards SET list_id = ?, position = ?, updated_at = ? WHERE id = ?")
            .bind(list_id)
            .bind(position)
            .bind(Utc::now())
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Card {} now at {} in list {}", card_id, position, list_id);
        self.get_card(card_id).await
    }

    /// Give every card of a list an evenly spaced position, keeping order
    pub async fn renumber_cards(&self, list_id: &str) -> Result<Vec<(String, f64)>> {
        self.get_list(list_id).await?;

        let mut tx = self.pool.begin().await?;

        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM cards WHERE list_id = ? ORDER BY position ASC, created_at ASC",
        )
        .bind(list_id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();
        let positions = renumbered_positions(ids.len());
        let placements: Vec<(String, f64)> = ids.into_iter().zip(positions).collect();

        for (id, position) in &placements {
            sqlx::query("UPDATE cards SET position = ?, updated_at = ? WHERE id = ?")
                .bind(position)
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Renumbered {} cards in list {}", placements.len(), list_id);
        Ok(placements)
    }

    async fn touch_card(&self, card_id: &str) -> Result<()> {
        sqlx::query("UPDATE cards SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(card_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ===== Labels =====

    pub async fn list_labels(&self) -> Result<Vec<Label>> {
        let labels = sqlx::query_as::<_, Label>("SELECT * FROM labels ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(labels)
    }

    pub async fn get_label(&self, id: &str) -> Result<Label> {
        sqlx::query_as::<_, Label>("SELECT * FROM labels WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::LabelNotFound(id.to_string()))
    }

    pub async fn create_label(&self, title: &str, color: &str) -> Result<Label> {
        let id = Uuid::new_v4().to_string();

        let label = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (id, title, color, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created label: {} ({})", id, title);
        Ok(label)
    }

    pub async fn delete_label(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM labels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::LabelNotFound(id.to_string()));
        }

        Ok(())
    }

    pub async fn card_labels(&self, card_id: &str) -> Result<Vec<Label>> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT lb.* FROM labels lb
            JOIN card_labels cl ON cl.label_id = lb.id
            WHERE cl.card_id = ?
            ORDER BY cl.created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(labels)
    }

    /// Link a label to a card; linking twice is a no-op
    pub async fn attach_label(&self, card_id: &str, label_id: &str) -> Result<()> {
        self.get_card(card_id).await?;
        let label = self.get_label(label_id).await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO card_labels (card_id, label_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(card_id)
        .bind(label_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            self.touch_card(card_id).await?;
            tracing::debug!("Added label {} to card {}", label.title, card_id);
        }

        Ok(())
    }

    pub async fn detach_label(&self, card_id: &str, label_id: &str) -> Result<()> {
        let removed = sqlx::query("DELETE FROM card_labels WHERE card_id = ? AND label_id = ?")
            .bind(card_id)
            .bind(label_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            self.touch_card(card_id).await?;
            tracing::debug!("Removed label {} from card {}", label_id, card_id);
        }

        Ok(())
    }

    // ===== Checklists =====

    pub async fn get_checklist(&self, id: &str) -> Result<ChecklistRow> {
        sqlx::query_as::<_, ChecklistRow>("SELECT * FROM checklists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ChecklistNotFound(id.to_string()))
    }

    pub async fn create_checklist(&self, card_id: &str, title: &str) -> Result<ChecklistRow> {
        self.get_card(card_id).await?;

        let last: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM checklists WHERE card_id = ?")
            .bind(card_id)
            .fetch_one(&self.pool)
            .await?;

        let checklist = sqlx::query_as::<_, ChecklistRow>(
            r#"
            INSERT INTO checklists (id, card_id, title, position, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(card_id)
        .bind(title)
        .bind(last.unwrap_or(0) + 1)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created checklist: {} for card: {}", checklist.id, card_id);
        Ok(checklist)
    }

    pub async fn delete_checklist(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM checklists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ChecklistNotFound(id.to_string()));
        }

        Ok(())
    }

    pub async fn get_checklist_item(&self, id: &str) -> Result<ChecklistItem> {
        sqlx::query_as::<_, ChecklistItem>("SELECT * FROM checklist_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ChecklistItemNotFound(id.to_string()))
    }

    pub async fn add_checklist_item(&self, checklist_id: &str, title: &str) -> Result<ChecklistItem> {
        self.get_checklist(checklist_id).await?;

        let last: Option<i64> =
            sqlx::query_scalar("SELECT MAX(position) FROM checklist_items WHERE checklist_id = ?")
                .bind(checklist_id)
                .fetch_one(&self.pool)
                .await?;

        let item = sqlx::query_as::<_, ChecklistItem>(
            r#"
            INSERT INTO checklist_items (id, checklist_id, title, position, checked, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(checklist_id)
        .bind(title)
        .bind(last.unwrap_or(0) + 1)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn set_checklist_item_checked(&self, id: &str, checked: bool) -> Result<ChecklistItem> {
        let rows = sqlx::query("UPDATE checklist_items SET checked = ? WHERE id = ?")
            .bind(checked)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ChecklistItemNotFound(id.to_string()));
        }

        self.get_checklist_item(id).await
    }

    pub async fn rename_checklist_item(&self, id: &str, title: &str) -> Result<ChecklistItem> {
        let rows = sqlx::query("UPDATE checklist_items SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ChecklistItemNotFound(id.to_string()));
        }

        self.get_checklist_item(id).await
    }

    pub async fn delete_checklist_item(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM checklist_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ChecklistItemNotFound(id.to_string()));
        }

        Ok(())
    }

    // ===== Comments =====

    pub async fn add_comment(&self, card_id: &str, content: &str, author: Option<&str>) -> Result<Comment> {
        self.get_card(card_id).await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, card_id, content, author, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(card_id)
        .bind(content)
        .bind(author)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn delete_comment(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::CommentNotFound(id.to_string()));
        }

        Ok(())
    }

    // ===== Attachments =====

    pub async fn create_attachment(&self, req: CreateAttachmentRequest) -> Result<Attachment> {
        self.get_card(&req.card_id).await?;

        let attachment = sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (id, card_id, filename, url, mime_type, size, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&req.card_id)
        .bind(&req.filename)
        .bind(&req.url)
        .bind(&req.mime_type)
        .bind(req.size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Recorded attachment: {} for card: {}", attachment.id, req.card_id);
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::AttachmentNotFound(id.to_string()));
        }

        Ok(())
    }

    // ===== Completion notifications =====

    pub async fn record_completion(&self, work_site_id: i64, card_title: &str) -> Result<CompletionNotification> {
        let notification = sqlx::query_as::<_, CompletionNotification>(
            r#"
            INSERT INTO completion_notifications (id, work_site_id, card_title, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(work_site_id)
        .bind(card_title)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn list_completion_notifications(&self, work_site_id: i64) -> Result<Vec<CompletionNotification>> {
        let notifications = sqlx::query_as::<_, CompletionNotification>(
            r#"
            SELECT * FROM completion_notifications
            WHERE work_site_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(work_site_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }
}
