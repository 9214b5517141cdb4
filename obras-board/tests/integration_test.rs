//! Integration tests for obras-board
//!
//! These tests drive the board end to end over a file-backed database:
//! - Application wiring and settings
//! - Drag-and-drop with label rules and completion notifications
//! - Reconciliation after remote failures

use obras_board::app::AppState;
use obras_board::board::{
    BoardCache, DragHandler, DragOutcome, DropEvent, DropLocation, ListRole,
};
use obras_board::database::{create_pool, Label, Repository};
use obras_board::services::settings::{BoardSettings, NotificationSettings};
use obras_board::services::{BoardService, SettingsService, ToastBuffer, ToastKind};
use std::sync::Arc;
use tempfile::TempDir;

const SITE: i64 = 42;

/// Helper to create application state in a fresh data directory
async fn create_test_app() -> (AppState, Arc<ToastBuffer>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let toasts = Arc::new(ToastBuffer::new());

    let state = AppState::initialize(temp_dir.path().to_path_buf(), toasts.clone())
        .await
        .unwrap();

    (state, toasts, temp_dir)
}

fn drop_event(card_id: &str, from: (&str, usize), to: (&str, usize)) -> DropEvent {
    DropEvent {
        card_id: card_id.to_string(),
        source: DropLocation::new(from.0, from.1),
        destination: Some(DropLocation::new(to.0, to.1)),
    }
}

fn label_titled(labels: &[Label], title: &str) -> Label {
    labels.iter().find(|l| l.title == title).unwrap().clone()
}

#[tokio::test]
async fn test_initialize_creates_database_and_settings() {
    let (state, _toasts, temp) = create_test_app().await;

    assert!(temp.path().join("obras-board.db").exists());
    assert!(temp.path().join("settings.json").exists());
    let settings = state.settings_service.load().await.unwrap();
    assert_eq!(settings.board, BoardSettings::default());
    assert!(state.drag_handler.options().notify_completion);

    let board = state.board_service.open_board(SITE).await.unwrap();
    assert_eq!(board.work_site_id, SITE);
    assert_eq!(board.lists.len(), 3);
}

#[tokio::test]
async fn test_drag_into_completed_list() {
    let (state, toasts, _temp) = create_test_app().await;
    let service = &state.board_service;

    let board = service.open_board(SITE).await.unwrap();
    let urgent_list = board.lists[0].id.clone();
    let done_list = board.lists[2].id.clone();
    assert_eq!(board.lists[2].role, ListRole::Completed);

    let labels = service.list_labels().await.unwrap();
    let urgent = label_titled(&labels, "Urgente");
    let doing = label_titled(&labels, "Fazendo");
    let done = label_titled(&labels, "Concluído");

    let card = service
        .create_card(SITE, &urgent_list, "Impermeabilizar laje", None, None)
        .await
        .unwrap();
    service.toggle_label(SITE, &card.id, &urgent.id).await.unwrap();
    service.toggle_label(SITE, &card.id, &doing.id).await.unwrap();

    let outcome = state
        .drag_handler
        .handle_drag_end(SITE, drop_event(&card.id, (&urgent_list, 0), (&done_list, 0)))
        .await;

    let DragOutcome::Applied(report) = outcome else {
        panic!("expected the drop to be applied, got {:?}", outcome);
    };
    assert!(report.moved_across_lists);
    assert!(!report.failed);

    let board = service.cache().get(SITE).await.unwrap();
    assert!(board.lists[0].cards.is_empty());
    let moved = &board.lists[2].cards[0];
    assert_eq!(moved.id, card.id);
    assert_eq!(moved.labels, vec![done]);

    let notifications = service.completion_notifications(SITE).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].card_title, "Impermeabilizar laje");

    let shown = toasts.drain();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, ToastKind::Success);
}

#[tokio::test]
async fn test_reorder_within_list_persists() {
    let (state, _toasts, _temp) = create_test_app().await;
    let service = &state.board_service;

    let board = service.open_board(SITE).await.unwrap();
    let doing_list = board.lists[1].id.clone();

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let card = service
            .create_card(SITE, &doing_list, title, None, None)
            .await
            .unwrap();
        ids.push(card.id);
    }

    state
        .drag_handler
        .handle_drag_end(SITE, drop_event(&ids[2], (&doing_list, 2), (&doing_list, 0)))
        .await;

    // Read straight from storage, bypassing the cache
    let board = service.refresh_board(SITE).await.unwrap();
    let list = &board.lists[1];
    let order: Vec<_> = list.cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(order, vec!["C", "A", "B"]);
    assert_eq!(list.cards[0].position, 500.0);
    assert!(list.cards[0].labels.is_empty());
}

#[tokio::test]
async fn test_completion_notification_follows_settings() {
    let temp_dir = TempDir::new().unwrap();
    SettingsService::new(temp_dir.path().to_path_buf())
        .update_notifications(NotificationSettings {
            completion_enabled: false,
            toast_on_success: false,
        })
        .await
        .unwrap();

    let toasts = Arc::new(ToastBuffer::new());
    let state = AppState::initialize(temp_dir.path().to_path_buf(), toasts.clone())
        .await
        .unwrap();
    let service = &state.board_service;

    let board = service.open_board(SITE).await.unwrap();
    let from = board.lists[0].id.clone();
    let to = board.lists[2].id.clone();
    let card = service.create_card(SITE, &from, "Pintura", None, None).await.unwrap();

    state
        .drag_handler
        .handle_drag_end(SITE, drop_event(&card.id, (&from, 0), (&to, 0)))
        .await;

    let board = service.cache().get(SITE).await.unwrap();
    assert_eq!(board.lists[2].cards[0].labels[0].title, "Concluído");
    assert!(service.completion_notifications(SITE).await.unwrap().is_empty());
    assert!(toasts.drain().is_empty());
}

#[tokio::test]
async fn test_refetch_restores_backend_state_after_failed_move() {
    let temp_dir = TempDir::new().unwrap();
    let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
    let repo = Repository::new(pool);
    let cache = BoardCache::new();
    let toasts = Arc::new(ToastBuffer::new());

    let service = BoardService::new(repo.clone(), cache.clone(), BoardSettings::default());
    let handler = DragHandler::new(Arc::new(repo.clone()), cache.clone(), toasts.clone());

    let board = service.open_board(SITE).await.unwrap();
    let from = board.lists[0].id.clone();
    let gone = board.lists[1].id.clone();
    let card = service.create_card(SITE, &from, "Reboco", None, None).await.unwrap();

    // Someone else deletes the destination; the cached board still shows it
    repo.delete_list(&gone).await.unwrap();
    assert_eq!(cache.get(SITE).await.unwrap().lists.len(), 3);

    let outcome = handler
        .handle_drag_end(SITE, drop_event(&card.id, (&from, 0), (&gone, 0)))
        .await;

    let DragOutcome::Applied(report) = outcome else {
        panic!("expected the drop to be applied, got {:?}", outcome);
    };
    assert!(report.failed);

    let board = cache.get(SITE).await.unwrap();
    assert_eq!(board.lists.len(), 2);
    assert!(board.list(&gone).is_none());
    let (list, stored) = board.find_card(&card.id).unwrap();
    assert_eq!(list.id, from);
    assert_eq!(stored.position, card.position);

    let shown = toasts.drain();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, ToastKind::Error);
}

#[tokio::test]
async fn test_settings_update_reaches_running_handler() {
    let (state, toasts, temp) = create_test_app().await;
    let service = &state.board_service;

    let board = service.open_board(SITE).await.unwrap();
    let from = board.lists[0].id.clone();
    let to = board.lists[2].id.clone();
    let card = service.create_card(SITE, &from, "Forro", None, None).await.unwrap();

    let applied = state
        .update_notification_settings(NotificationSettings {
            completion_enabled: false,
            toast_on_success: true,
        })
        .await
        .unwrap();
    assert!(!applied.notifications.completion_enabled);

    state
        .drag_handler
        .handle_drag_end(SITE, drop_event(&card.id, (&from, 0), (&to, 0)))
        .await;

    assert!(service.completion_notifications(SITE).await.unwrap().is_empty());
    assert_eq!(toasts.drain()[0].kind, ToastKind::Success);

    // Persisted for the next start
    let reloaded = SettingsService::new(temp.path().to_path_buf())
        .load()
        .await
        .unwrap();
    assert!(!reloaded.notifications.completion_enabled);
}

