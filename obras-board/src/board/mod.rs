//! Board core
//!
//! Kanban board of a work site: snapshot model, position allocation,
//! status label rules, the snapshot cache and the drag-and-drop protocol.

pub mod backend;
pub mod cache;
pub mod drag;
pub mod model;
pub mod position;
pub mod rules;

pub use backend::BoardBackend;
pub use cache::BoardCache;
pub use drag::{DragHandler, DragOptions, DragOutcome, DragReport, DropEvent, DropLocation};
pub use model::{Board, BoardList, Card, Checklist, ListRole};
