//! Application configuration constants
//!
//! Central location for ordering constants, seed data and validation
//! boundaries used throughout the board core.

// ===== Card Positions =====

/// Gap left between consecutive cards when appending or renumbering.
pub const POSITION_STEP: f64 = 1000.0;

/// Position given to the first card of an empty list.
pub const EMPTY_LIST_POSITION: f64 = 1000.0;

// ===== Lists =====

/// Lists created on a board that has none yet
pub const DEFAULT_LIST_TITLES: &[&str] = &["Urgente", "Fazendo", "Concluído"];

/// Name given to a board created on demand for a work site
pub const DEFAULT_BOARD_NAME: &str = "Pendências";

// ===== Labels =====

/// Global labels seeded by the initial migration: (title, color)
pub const SEED_LABELS: &[(&str, &str)] = &[
    ("Urgente", "red"),
    ("Fazendo", "yellow"),
    ("Concluído", "green"),
];

// ===== Validation Limits =====

/// Maximum length of a list, card, checklist or label title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

// ===== Database =====

/// Connections in the application pool
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// Seconds SQLite waits on a locked database before failing
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

// ===== User-facing messages =====

pub const TOAST_SUCCESS_TITLE: &str = "Success";
pub const TOAST_ERROR_TITLE: &str = "Error";
pub const TOAST_MOVE_SUCCESS: &str = "Card moved.";
pub const TOAST_GENERIC_FAILURE: &str = "Could not complete the operation. Try again.";
