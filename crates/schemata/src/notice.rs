//! User-facing notices
//!
//! Failures and confirmations are reported through a `Notifier` so the
//! caller decides how to show them (status toast, stderr, log).

use std::sync::Mutex;

use crate::error::SchemataError;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// A non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: None,
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            title: title.into(),
            message: Some(message.into()),
        }
    }

    /// Build a failure notice from an error
    pub fn from_error(err: &SchemataError) -> Self {
        Self::failure(err.title(), err.to_string())
    }

    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }

    /// Single-line rendering ("Title: message")
    pub fn line(&self) -> String {
        match &self.message {
            Some(msg) => format!("{}: {}", self.title, msg),
            None => self.title.clone(),
        }
    }
}

/// Sink for notices
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!("{}", notice.line()),
            NoticeLevel::Failure => tracing::warn!("{}", notice.line()),
        }
    }
}

/// Buffers notices until drained
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered notices
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn is_empty(&self) -> bool {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}
