//! Services module
//!
//! Business logic services that coordinate between the host, the board
//! core and the repository.

pub mod board;
pub mod settings;
pub mod toasts;

pub use board::BoardService;
pub use settings::{AppSettings, SettingsService};
pub use toasts::{LogToasts, Toast, ToastBuffer, ToastKind, ToastSink};
