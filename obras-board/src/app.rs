//! Application state and initialization
//!
//! All services are initialized here and made available through AppState.

use crate::board::{BoardCache, DragHandler, DragOptions};
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::settings::{BoardSettings, NotificationSettings};
use crate::services::{AppSettings, BoardService, SettingsService, ToastSink};
use std::path::PathBuf;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub settings_service: SettingsService,
    pub board_service: BoardService,
    pub drag_handler: Arc<DragHandler<Repository>>,
}

impl AppState {
    /// Application setup - called once on startup
    pub async fn initialize(app_data_dir: PathBuf, toasts: Arc<dyn ToastSink>) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        tokio::fs::create_dir_all(&app_data_dir).await?;

        let settings_service = SettingsService::new(app_data_dir.clone());
        let settings = settings_service.load().await?;

        let pool = create_pool(&app_data_dir.join("obras-board.db")).await?;
        let repo = Repository::new(pool);

        // The CRUD service and the drag handler share one snapshot store
        let cache = BoardCache::new();
        let board_service = BoardService::new(repo.clone(), cache.clone(), settings.board.clone());
        let drag_handler = DragHandler::new(Arc::new(repo), cache, toasts)
            .with_options(DragOptions::from(&settings));

        tracing::info!("Application initialized successfully");

        Ok(Self {
            app_data_dir,
            settings_service,
            board_service,
            drag_handler: Arc::new(drag_handler),
        })
    }

    /// Persist board settings and apply them to the running services
    pub async fn update_board_settings(&self, board: BoardSettings) -> Result<AppSettings> {
        self.settings_service.update_board(board).await?;
        self.reload_settings().await
    }

    /// Persist notification settings and apply them to the running services
    pub async fn update_notification_settings(
        &self,
        notifications: NotificationSettings,
    ) -> Result<AppSettings> {
        self.settings_service.update_notifications(notifications).await?;
        self.reload_settings().await
    }

    async fn reload_settings(&self) -> Result<AppSettings> {
        let settings = self.settings_service.load().await?;

        self.board_service.set_settings(settings.board.clone());
        self.drag_handler.set_options(DragOptions::from(&settings));

        tracing::info!("Settings applied");
        Ok(settings)
    }
}
