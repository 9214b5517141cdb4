//! Board snapshot store
//!
//! Holds exactly one board per work-site id. Writers always replace the
//! whole snapshot; nothing mutates a cached board in place, so the last
//! writer wins. Readers get an `Arc` and keep a consistent view even if
//! the entry is replaced meanwhile.

use super::backend::BoardBackend;
use super::model::Board;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct BoardCache {
    snapshots: Arc<RwLock<HashMap<i64, Arc<Board>>>>,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or `None` if not loaded yet
    pub async fn get(&self, work_site_id: i64) -> Option<Arc<Board>> {
        self.snapshots.read().await.get(&work_site_id).cloned()
    }

    /// Replace the snapshot wholesale
    pub async fn replace(&self, work_site_id: i64, board: Board) -> Arc<Board> {
        let board = Arc::new(board);
        self.snapshots
            .write()
            .await
            .insert(work_site_id, board.clone());
        board
    }

    pub async fn invalidate(&self, work_site_id: i64) {
        self.snapshots.write().await.remove(&work_site_id);
    }

    /// Snapshot, fetching it first when absent
    pub async fn load<B>(&self, work_site_id: i64, backend: &B) -> Result<Arc<Board>>
    where
        B: BoardBackend + ?Sized,
    {
        if let Some(board) = self.get(work_site_id).await {
            return Ok(board);
        }

        self.invalidate_and_refetch(work_site_id, backend).await
    }

    /// Reload the snapshot from the backend and replace it.
    ///
    /// Readers keep seeing the previous snapshot while the fetch runs. On
    /// failure the entry is dropped so the next `load` retries.
    pub async fn invalidate_and_refetch<B>(&self, work_site_id: i64, backend: &B) -> Result<Arc<Board>>
    where
        B: BoardBackend + ?Sized,
    {
        let board = match backend.fetch_board(work_site_id).await {
            Ok(board) => board,
            Err(e) => {
                self.invalidate(work_site_id).await;
                return Err(e);
            }
        };

        tracing::debug!(
            "Refetched board for work site {} ({} lists, {} cards)",
            work_site_id,
            board.lists.len(),
            board.card_count()
        );

        Ok(self.replace(work_site_id, board).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Label;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingBackend {
        fetches: AtomicUsize,
        fail: AtomicBool,
        delay_ms: AtomicU64,
    }

    impl CountingBackend {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay_ms: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl BoardBackend for CountingBackend {
        async fn fetch_board(&self, work_site_id: i64) -> Result<Board> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Generic("offline".to_string()));
            }
            Ok(Board::empty(work_site_id, format!("fetch {}", n)))
        }

        async fn move_card(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        async fn set_card_position(&self, _: &str, _: &str, _: f64) -> Result<()> {
            Ok(())
        }

        async fn list_labels(&self) -> Result<Vec<Label>> {
            Ok(Vec::new())
        }

        async fn add_label_to_card(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        async fn remove_label_from_card(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        async fn notify_card_completed(&self, _: i64, _: &str) {}
    }

    #[tokio::test]
    async fn test_get_before_load_is_none() {
        let cache = BoardCache::new();
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn test_load_fetches_once() {
        let cache = BoardCache::new();
        let backend = CountingBackend::new();

        let first = cache.load(7, &backend).await.unwrap();
        let second = cache.load(7, &backend).await.unwrap();

        assert_eq!(first.name, "fetch 1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_replace_is_wholesale_and_keyed() {
        let cache = BoardCache::new();

        cache.replace(1, Board::empty(1, "one")).await;
        cache.replace(2, Board::empty(2, "two")).await;
        let held = cache.get(1).await.unwrap();
        cache.replace(1, Board::empty(1, "uno")).await;

        assert_eq!(held.name, "one");
        assert_eq!(cache.get(1).await.unwrap().name, "uno");
        assert_eq!(cache.get(2).await.unwrap().name, "two");
    }

    #[tokio::test]
    async fn test_refetch_replaces_snapshot() {
        let cache = BoardCache::new();
        let backend = CountingBackend::new();

        cache.replace(3, Board::empty(3, "optimistic")).await;
        let board = cache.invalidate_and_refetch(3, &backend).await.unwrap();

        assert_eq!(board.name, "fetch 1");
        assert_eq!(cache.get(3).await.unwrap().name, "fetch 1");
    }

    #[tokio::test]
    async fn test_failed_refetch_leaves_entry_empty() {
        let cache = BoardCache::new();
        let backend = CountingBackend::new();
        backend.fail.store(true, Ordering::SeqCst);

        cache.replace(4, Board::empty(4, "optimistic")).await;
        assert!(cache.invalidate_and_refetch(4, &backend).await.is_err());
        assert!(cache.get(4).await.is_none());

        backend.fail.store(false, Ordering::SeqCst);
        let board = cache.load(4, &backend).await.unwrap();
        assert_eq!(board.name, "fetch 2");
    }

    #[tokio::test]
    async fn test_snapshot_stays_visible_during_refetch() {
        let cache = BoardCache::new();
        let backend = Arc::new(CountingBackend::new());
        backend.delay_ms.store(200, Ordering::SeqCst);
        cache.replace(5, Board::empty(5, "current")).await;

        let refetch = {
            let cache = cache.clone();
            let backend = backend.clone();
            tokio::spawn(async move { cache.invalidate_and_refetch(5, &*backend).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get(5).await.unwrap().name, "current");

        refetch.await.unwrap().unwrap();
        assert_eq!(cache.get(5).await.unwrap().name, "fetch 1");
    }
}
