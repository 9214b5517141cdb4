//! obras-board library
//!
//! Board core of the work-site application: the pending-task kanban,
//! its drag-and-drop protocol and the SQLite store behind it.

pub mod app;
pub mod board;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod services;
