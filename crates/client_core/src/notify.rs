//! Transient notification queue. The host surface drains it each frame and
//! shows whatever accumulated since the last drain.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

#[derive(Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: NotificationKind, text: impl Into<String>) {
        let text = text.into();
        self.queue
            .lock()
            .expect("notification queue poisoned")
            .push(Notification { kind, text });
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(NotificationKind::Success, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NotificationKind::Error, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(NotificationKind::Info, text);
    }

    /// Queues a notification after a delay without blocking the caller.
    /// Used for the encouragement follow-up on task completion.
    pub fn push_delayed(&self, kind: NotificationKind, text: impl Into<String>, delay: Duration) {
        let this = self.clone();
        let text = text.into();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.push(kind, text);
        });
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .expect("notification queue poisoned")
            .clone()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock().expect("notification queue poisoned"))
    }
}
