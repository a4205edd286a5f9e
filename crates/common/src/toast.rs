//! Transient user notifications
//!
//! Interaction failures surface as a single toast. The sink is a trait so
//! the CLI can print them, tests can count them, and an embedding UI can
//! render them however it likes.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastLevel::Info => write!(f, "info"),
            ToastLevel::Success => write!(f, "success"),
            ToastLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }
}

/// Destination for toasts
pub trait ToastSink: fmt::Debug + Send + Sync {
    fn show(&self, toast: Toast);
}

/// In-memory toast queue, drained by whoever renders them
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every queued toast, oldest first
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl ToastSink for ToastQueue {
    fn show(&self, toast: Toast) {
        tracing::debug!(level = %toast.level, message = %toast.message, "toast");
        self.inner.lock().push(toast);
    }
}
