//! Board service
//!
//! CRUD workflows around a work site's board. Every successful mutation
//! refetches the board so the cached snapshot matches storage.

use crate::board::rules::infer_list_role;
use crate::board::{Board, BoardCache, ListRole};
use crate::config::{MAX_COMMENT_LENGTH, MAX_TITLE_LENGTH};
use crate::database::{
    Attachment, CardRow, ChecklistItem, ChecklistRow, Comment, CompletionNotification,
    CreateAttachmentRequest, CreateCardRequest, Label, ListRow, Repository, UpdateCardRequest,
};
use crate::error::{AppError, Result};
use crate::services::settings::BoardSettings;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// Trimmed title, rejected when blank or too long
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "Title cannot exceed {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_comment(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Comment cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Comment cannot exceed {} characters",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Service for board CRUD
#[derive(Clone)]
pub struct BoardService {
    repo: Repository,
    cache: BoardCache,
    settings: Arc<RwLock<BoardSettings>>,
}

impl BoardService {
    pub fn new(repo: Repository, cache: BoardCache, settings: BoardSettings) -> Self {
        Self {
            repo,
            cache,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn settings(&self) -> BoardSettings {
        self.settings.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the board settings used by this service and its clones
    pub fn set_settings(&self, settings: BoardSettings) {
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// Cached board, fetched on first use
    pub async fn load_board(&self, work_site_id: i64) -> Result<Arc<Board>> {
        self.cache.load(work_site_id, &self.repo).await
    }

    pub async fn refresh_board(&self, work_site_id: i64) -> Result<Arc<Board>> {
        self.cache.invalidate_and_refetch(work_site_id, &self.repo).await
    }

    /// Open a work site's board, creating it and its default lists
    /// when it has none.
    pub async fn open_board(&self, work_site_id: i64) -> Result<Arc<Board>> {
        tracing::info!("Opening board for work site {}", work_site_id);

        let settings = self.settings();
        self.repo.ensure_board(work_site_id).await?;
        if settings.create_default_lists {
            self.repo
                .create_default_lists(work_site_id, &settings.default_list_titles)
                .await?;
        }

        self.refresh_board(work_site_id).await
    }

    /// The mutation already succeeded; a failed refetch only leaves the
    /// cache empty until the next load.
    async fn reconcile(&self, work_site_id: i64) {
        if let Err(e) = self.refresh_board(work_site_id).await {
            tracing::warn!("Failed to refresh board {} after update: {}", work_site_id, e);
        }
    }

    // ===== Lists =====

    /// Append a list; without an explicit role it is inferred from the title
    pub async fn create_list(&self, work_site_id: i64, title: &str, role: Option<ListRole>) -> Result<ListRow> {
        let title = validate_title(title)?;
        let role = role.unwrap_or_else(|| infer_list_role(&title));

        tracing::info!("Creating list '{}' ({})", title, role);
        let list = self.repo.create_list(work_site_id, &title, role).await?;

        self.reconcile(work_site_id).await;
        Ok(list)
    }

    /// Rename a list. The role stays as it was.
    pub async fn rename_list(&self, work_site_id: i64, list_id: &str, title: &str) -> Result<ListRow> {
        let title = validate_title(title)?;
        let list = self.repo.rename_list(list_id, &title).await?;

        self.reconcile(work_site_id).await;
        Ok(list)
    }

    pub async fn set_list_role(&self, work_site_id: i64, list_id: &str, role: ListRole) -> Result<ListRow> {
        tracing::info!("Setting role of list {} to {}", list_id, role);
        let list = self.repo.set_list_role(list_id, role).await?;

        self.reconcile(work_site_id).await;
        Ok(list)
    }

    pub async fn delete_list(&self, work_site_id: i64, list_id: &str) -> Result<()> {
        tracing::info!("Deleting list: {}", list_id);
        self.repo.delete_list(list_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    /// Renumber a list's cards to evenly spaced positions
    pub async fn compact_list(&self, work_site_id: i64, list_id: &str) -> Result<()> {
        self.repo.renumber_cards(list_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    // ===== Cards =====

    pub async fn create_card(
        &self,
        work_site_id: i64,
        list_id: &str,
        title: &str,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<CardRow> {
        let req = CreateCardRequest {
            list_id: list_id.to_string(),
            title: validate_title(title)?,
            description,
            due_date,
        };

        let card = self.repo.create_card(req).await?;
        tracing::info!("Card created successfully: {}", card.id);

        self.reconcile(work_site_id).await;
        Ok(card)
    }

    pub async fn update_card(&self, work_site_id: i64, mut req: UpdateCardRequest) -> Result<CardRow> {
        if let Some(title) = req.title.as_deref() {
            req.title = Some(validate_title(title)?);
        }

        tracing::debug!("Updating card: {}", req.id);
        let card = self.repo.update_card(req).await?;

        self.reconcile(work_site_id).await;
        Ok(card)
    }

    pub async fn delete_card(&self, work_site_id: i64, card_id: &str) -> Result<()> {
        tracing::info!("Deleting card: {}", card_id);
        self.repo.delete_card(card_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    // ===== Labels =====

    pub async fn list_labels(&self) -> Result<Vec<Label>> {
        self.repo.list_labels().await
    }

    pub async fn create_label(&self, title: &str, color: &str) -> Result<Label> {
        let title = validate_title(title)?;
        self.repo.create_label(&title, color).await
    }

    pub async fn delete_label(&self, work_site_id: i64, label_id: &str) -> Result<()> {
        self.repo.delete_label(label_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    /// Attach the label if the card lacks it, detach it otherwise.
    /// Returns whether the card has the label afterwards.
    pub async fn toggle_label(&self, work_site_id: i64, card_id: &str, label_id: &str) -> Result<bool> {
        let has_label = self
            .repo
            .card_labels(card_id)
            .await?
            .iter()
            .any(|label| label.id == label_id);

        if has_label {
            self.repo.detach_label(card_id, label_id).await?;
        } else {
            self.repo.attach_label(card_id, label_id).await?;
        }

        self.reconcile(work_site_id).await;
        Ok(!has_label)
    }

    // ===== Checklists =====

    pub async fn create_checklist(&self, work_site_id: i64, card_id: &str, title: &str) -> Result<ChecklistRow> {
        let title = validate_title(title)?;
        let checklist = self.repo.create_checklist(card_id, &title).await?;

        self.reconcile(work_site_id).await;
        Ok(checklist)
    }

    pub async fn delete_checklist(&self, work_site_id: i64, checklist_id: &str) -> Result<()> {
        self.repo.delete_checklist(checklist_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    pub async fn add_checklist_item(&self, work_site_id: i64, checklist_id: &str, title: &str) -> Result<ChecklistItem> {
        let title = validate_title(title)?;
        let item = self.repo.add_checklist_item(checklist_id, &title).await?;

        self.reconcile(work_site_id).await;
        Ok(item)
    }

    pub async fn toggle_checklist_item(&self, work_site_id: i64, item_id: &str) -> Result<ChecklistItem> {
        let item = self.repo.get_checklist_item(item_id).await?;
        let item = self.repo.set_checklist_item_checked(item_id, !item.checked).await?;

        self.reconcile(work_site_id).await;
        Ok(item)
    }

    pub async fn rename_checklist_item(&self, work_site_id: i64, item_id: &str, title: &str) -> Result<ChecklistItem> {
        let title = validate_title(title)?;
        let item = self.repo.rename_checklist_item(item_id, &title).await?;

        self.reconcile(work_site_id).await;
        Ok(item)
    }

    pub async fn delete_checklist_item(&self, work_site_id: i64, item_id: &str) -> Result<()> {
        self.repo.delete_checklist_item(item_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    // ===== Comments and attachments =====

    pub async fn add_comment(
        &self,
        work_site_id: i64,
        card_id: &str,
        content: &str,
        author: Option<&str>,
    ) -> Result<Comment> {
        let content = validate_comment(content)?;
        let comment = self.repo.add_comment(card_id, &content, author).await?;

        self.reconcile(work_site_id).await;
        Ok(comment)
    }

    pub async fn delete_comment(&self, work_site_id: i64, comment_id: &str) -> Result<()> {
        self.repo.delete_comment(comment_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    /// Record an attachment already uploaded elsewhere
    pub async fn add_attachment(&self, work_site_id: i64, req: CreateAttachmentRequest) -> Result<Attachment> {
        if req.filename.trim().is_empty() || req.url.trim().is_empty() {
            return Err(AppError::Validation(
                "Attachment needs a filename and a URL".to_string(),
            ));
        }
        if req.size < 0 {
            return Err(AppError::Validation("Attachment size cannot be negative".to_string()));
        }

        let attachment = self.repo.create_attachment(req).await?;

        self.reconcile(work_site_id).await;
        Ok(attachment)
    }

    pub async fn delete_attachment(&self, work_site_id: i64, attachment_id: &str) -> Result<()> {
        self.repo.delete_attachment(attachment_id).await?;

        self.reconcile(work_site_id).await;
        Ok(())
    }

    pub async fn completion_notifications(&self, work_site_id: i64) -> Result<Vec<CompletionNotification>> {
        self.repo.list_completion_notifications(work_site_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    const SITE: i64 = 3;

    async fn create_test_service_with(settings: BoardSettings) -> BoardService {
        let pool = create_memory_pool().await.unwrap();

        BoardService::new(Repository::new(pool), BoardCache::new(), settings)
    }

    async fn create_test_service() -> BoardService {
        create_test_service_with(BoardSettings::default()).await
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Laje  ").unwrap(), "Laje");
        assert!(matches!(validate_title("   "), Err(AppError::Validation(_))));
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
        assert!(validate_title(&"ç".repeat(MAX_TITLE_LENGTH)).is_ok());
    }

    #[tokio::test]
    async fn test_open_board_creates_default_lists() {
        let service = create_test_service().await;

        let board = service.open_board(SITE).await.unwrap();

        let lists: Vec<_> = board
            .lists
            .iter()
            .map(|l| (l.title.as_str(), l.role))
            .collect();
        assert_eq!(
            lists,
            vec![
                ("Urgente", ListRole::None),
                ("Fazendo", ListRole::InProgress),
                ("Concluído", ListRole::Completed),
            ]
        );

        let reopened = service.open_board(SITE).await.unwrap();
        assert_eq!(reopened.lists.len(), 3);
    }

    #[tokio::test]
    async fn test_open_board_without_defaults() {
        let service = create_test_service_with(BoardSettings {
            create_default_lists: false,
            ..BoardSettings::default()
        })
        .await;

        let board = service.open_board(SITE).await.unwrap();

        assert!(board.lists.is_empty());
    }

    #[tokio::test]
    async fn test_settings_change_reaches_clones() {
        let service = create_test_service().await;
        let clone = service.clone();

        service.set_settings(BoardSettings {
            default_list_titles: vec!["A fazer".to_string(), "Feito".to_string()],
            ..BoardSettings::default()
        });

        let board = clone.open_board(SITE).await.unwrap();
        let titles: Vec<_> = board.lists.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["A fazer", "Feito"]);
    }

    #[tokio::test]
    async fn test_mutations_refresh_cache() {
        let service = create_test_service().await;
        let list = service.create_list(SITE, "Fundação", None).await.unwrap();

        let card = service
            .create_card(SITE, &list.id, " Escavar ", None, None)
            .await
            .unwrap();
        assert_eq!(card.title, "Escavar");

        let cached = service.cache().get(SITE).await.unwrap();
        assert_eq!(cached.card_count(), 1);

        service.delete_card(SITE, &card.id).await.unwrap();
        let cached = service.cache().get(SITE).await.unwrap();
        assert_eq!(cached.card_count(), 0);
    }

    #[tokio::test]
    async fn test_list_role_inferred_and_kept_on_rename() {
        let service = create_test_service().await;

        let list = service.create_list(SITE, "Em andamento", None).await.unwrap();
        assert_eq!(list.role, "in_progress");

        let renamed = service.rename_list(SITE, &list.id, "Obras").await.unwrap();
        assert_eq!(renamed.role, "in_progress");

        let explicit = service
            .create_list(SITE, "Entregue", Some(ListRole::Completed))
            .await
            .unwrap();
        assert_eq!(explicit.role, "completed");

        let cleared = service
            .set_list_role(SITE, &explicit.id, ListRole::None)
            .await
            .unwrap();
        assert_eq!(cleared.role, "none");
    }

    #[tokio::test]
    async fn test_blank_titles_rejected() {
        let service = create_test_service().await;

        assert!(matches!(
            service.create_list(SITE, "  ", None).await,
            Err(AppError::Validation(_))
        ));

        let list = service.create_list(SITE, "A", None).await.unwrap();
        let card = service.create_card(SITE, &list.id, "c", None, None).await.unwrap();
        let result = service
            .update_card(
                SITE,
                UpdateCardRequest {
                    id: card.id,
                    title: Some(String::new()),
                    ..UpdateCardRequest::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_toggle_label() {
        let service = create_test_service().await;
        let list = service.create_list(SITE, "A", None).await.unwrap();
        let card = service.create_card(SITE, &list.id, "c", None, None).await.unwrap();
        let label = service.list_labels().await.unwrap().remove(0);

        assert!(service.toggle_label(SITE, &card.id, &label.id).await.unwrap());
        let cached = service.cache().get(SITE).await.unwrap();
        assert!(cached.lists[0].cards[0].has_label(&label.id));

        assert!(!service.toggle_label(SITE, &card.id, &label.id).await.unwrap());
        let cached = service.cache().get(SITE).await.unwrap();
        assert!(cached.lists[0].cards[0].labels.is_empty());
    }

    #[tokio::test]
    async fn test_checklist_workflow() {
        let service = create_test_service().await;
        let list = service.create_list(SITE, "A", None).await.unwrap();
        let card = service.create_card(SITE, &list.id, "c", None, None).await.unwrap();

        let checklist = service.create_checklist(SITE, &card.id, "Vistoria").await.unwrap();
        let item = service
            .add_checklist_item(SITE, &checklist.id, "Prumo")
            .await
            .unwrap();

        let toggled = service.toggle_checklist_item(SITE, &item.id).await.unwrap();
        assert!(toggled.checked);
        let toggled = service.toggle_checklist_item(SITE, &item.id).await.unwrap();
        assert!(!toggled.checked);

        service.delete_checklist(SITE, &checklist.id).await.unwrap();
        let cached = service.cache().get(SITE).await.unwrap();
        assert!(cached.lists[0].cards[0].checklists.is_empty());
    }

    #[tokio::test]
    async fn test_comments_and_attachments() {
        let service = create_test_service().await;
        let list = service.create_list(SITE, "A", None).await.unwrap();
        let card = service.create_card(SITE, &list.id, "c", None, None).await.unwrap();

        assert!(service.add_comment(SITE, &card.id, " ", None).await.is_err());
        let comment = service
            .add_comment(SITE, &card.id, "Verificar prumo", Some("engenheira"))
            .await
            .unwrap();

        let rejected = service
            .add_attachment(
                SITE,
                CreateAttachmentRequest {
                    card_id: card.id.clone(),
                    filename: String::new(),
                    url: "https://storage.example/a.pdf".to_string(),
                    mime_type: None,
                    size: 10,
                },
            )
            .await;
        assert!(matches!(rejected, Err(AppError::Validation(_))));

        let attachment = service
            .add_attachment(
                SITE,
                CreateAttachmentRequest {
                    card_id: card.id.clone(),
                    filename: "planta.pdf".to_string(),
                    url: "https://storage.example/planta.pdf".to_string(),
                    mime_type: Some("application/pdf".to_string()),
                    size: 1024,
                },
            )
            .await
            .unwrap();

        let cached = service.cache().get(SITE).await.unwrap();
        let cached_card = &cached.lists[0].cards[0];
        assert_eq!(cached_card.comments, vec![comment.clone()]);
        assert_eq!(cached_card.attachments, vec![attachment.clone()]);

        service.delete_comment(SITE, &comment.id).await.unwrap();
        service.delete_attachment(SITE, &attachment.id).await.unwrap();
        let cached = service.cache().get(SITE).await.unwrap();
        assert!(cached.lists[0].cards[0].comments.is_empty());
        assert!(cached.lists[0].cards[0].attachments.is_empty());
    }

    #[tokio::test]
    async fn test_compact_list() {
        let service = create_test_service().await;
        let list = service.create_list(SITE, "A", None).await.unwrap();
        for title in ["a", "b", "c"] {
            service.create_card(SITE, &list.id, title, None, None).await.unwrap();
        }

        service.compact_list(SITE, &list.id).await.unwrap();

        let board = service.load_board(SITE).await.unwrap();
        assert_eq!(board.lists[0].positions(), vec![1000.0, 2000.0, 3000.0]);
    }

    #[tokio::test]
    async fn test_missing_card_propagates_not_found() {
        let service = create_test_service().await;

        let result = service.delete_card(SITE, "missing").await;

        assert!(matches!(result, Err(AppError::CardNotFound(_))));
    }
}
