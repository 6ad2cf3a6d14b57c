//! User feedback.
//!
//! The editor reports deletions, collisions and rejected input through a
//! [`Notifier`]; how that reaches the user (toast, log line, test
//! assertion) is up to the host.

use serde::{Deserialize, Serialize};

pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn warning(&mut self, message: &str);
}

/// Forwards notifications to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn error(&mut self, message: &str) {
        log::error!("{message}");
    }

    fn warning(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Keeps every notification, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.notifications.iter().filter(|n| n.level == level).count()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn push(&mut self, level: NotificationLevel, message: &str) {
        self.notifications.push(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&mut self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn error(&mut self, message: &str) {
        self.push(NotificationLevel::Error, message);
    }

    fn warning(&mut self, message: &str) {
        self.push(NotificationLevel::Warning, message);
    }
}
