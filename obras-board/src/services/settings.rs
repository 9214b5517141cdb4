//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::board::DragOptions;
use crate::config::{DEFAULT_LIST_TITLES, MAX_TITLE_LENGTH};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Board behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Create the default lists when a board is opened with no lists
    #[serde(default = "default_true")]
    pub create_default_lists: bool,
    #[serde(default = "default_list_titles")]
    pub default_list_titles: Vec<String>,
    /// Renumber a list when a drop leaves no room between positions
    #[serde(default = "default_true")]
    pub compact_on_collapse: bool,
}

fn default_true() -> bool {
    true
}

fn default_list_titles() -> Vec<String> {
    DEFAULT_LIST_TITLES.iter().map(|t| t.to_string()).collect()
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            create_default_lists: true,
            default_list_titles: default_list_titles(),
            compact_on_collapse: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Notify when a card lands in a completed list
    #[serde(default = "default_true")]
    pub completion_enabled: bool,
    #[serde(default = "default_true")]
    pub toast_on_success: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            completion_enabled: true,
            toast_on_success: true,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub board: BoardSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        for title in &self.board.default_list_titles {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation(
                    "Default list titles cannot be empty".to_string(),
                ));
            }
            if trimmed.chars().count() > MAX_TITLE_LENGTH {
                return Err(AppError::Validation(format!(
                    "Default list title too long: {}",
                    trimmed
                )));
            }
        }
        Ok(())
    }
}

impl From<&AppSettings> for DragOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            notify_completion: settings.notifications.completion_enabled,
            compact_on_collapse: settings.board.compact_on_collapse,
            toast_on_success: settings.notifications.toast_on_success,
        }
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    pub async fn get_board(&self) -> Result<BoardSettings> {
        let settings = self.load().await?;
        Ok(settings.board)
    }

    pub async fn update_board(&self, board: BoardSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.board = board;
        self.save(&settings).await?;
        Ok(())
    }

    pub async fn get_notifications(&self) -> Result<NotificationSettings> {
        let settings = self.load().await?;
        Ok(settings.notifications)
    }

    pub async fn update_notifications(&self, notifications: NotificationSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.notifications = notifications;
        self.save(&settings).await?;
        Ok(())
    }
}
