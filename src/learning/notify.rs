//! User-facing notifications (toast sink)
//!
//! Notifications are purely observational: they never fail and never
//! feed back into engine state.

use log::{info, warn};
use std::sync::Mutex;

pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_failure(&self, message: &str);
}

/// Notifier that writes to the application log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&self, message: &str) {
        info!("✅ {}", message);
    }

    fn notify_failure(&self, message: &str) {
        warn!("❌ {}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

/// Notifier that keeps every message, for assertions in tests
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Notification> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<Notification> {
        self.messages().pop()
    }

    fn push(&self, notification: Notification) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn notify_failure(&self, message: &str) {
        self.push(Notification::Failure(message.to_string()));
    }
}
