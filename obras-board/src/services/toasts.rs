//! Toasts
//!
//! Short-lived user notifications raised by board workflows. The host
//! decides how to show them through a `ToastSink`.

use crate::config::{TOAST_ERROR_TITLE, TOAST_GENERIC_FAILURE, TOAST_SUCCESS_TITLE};
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: TOAST_SUCCESS_TITLE.to_string(),
            description: description.into(),
        }
    }

    /// The one failure message users see, whichever step failed
    pub fn failure() -> Self {
        Self {
            kind: ToastKind::Error,
            title: TOAST_ERROR_TITLE.to_string(),
            description: TOAST_GENERIC_FAILURE.to_string(),
        }
    }
}

pub trait ToastSink: Send + Sync {
    fn show(&self, toast: Toast);
}

/// Writes toasts to the log; used by the headless host
pub struct LogToasts;

impl ToastSink for LogToasts {
    fn show(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => tracing::info!("[toast] {}: {}", toast.title, toast.description),
            ToastKind::Error => tracing::warn!("[toast] {}: {}", toast.title, toast.description),
        }
    }
}

/// Keeps toasts until the host drains them
#[derive(Default)]
pub struct ToastBuffer {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending toast, oldest first
    pub fn drain(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *toasts)
    }

    pub fn pending(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ToastSink for ToastBuffer {
    fn show(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast);
    }
}
