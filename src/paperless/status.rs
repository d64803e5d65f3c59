//! Status notifications for a hosting UI.
//!
//! Operations never hold a callback of their own; the caller hands in a
//! `StatusNotifier` and every progress, success or error update goes through it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Success,
    Error,
}

/// A single status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: Status,
    pub description: String,
    pub done: bool,
}

impl StatusEvent {
    pub fn progress(description: impl Into<String>) -> Self {
        Self {
            status: Status::InProgress,
            description: description.into(),
            done: false,
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            description: description.into(),
            done: true,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            description: description.into(),
            done: true,
        }
    }

    /// An error the operation recovers from; a final update still follows.
    pub fn interim_error(description: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            description: description.into(),
            done: false,
        }
    }

    /// Event in the `{"type": "status", "data": {...}}` envelope hosts expect.
    pub fn envelope(&self) -> Value {
        json!({ "type": "status", "data": self })
    }
}

/// Sink for status updates.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn notify(&self, event: StatusEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl StatusNotifier for NoopNotifier {
    async fn notify(&self, _event: StatusEvent) {}
}

/// Writes events to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl StatusNotifier for LogNotifier {
    async fn notify(&self, event: StatusEvent) {
        let envelope = event.envelope();
        match event.status {
            Status::Error => log::warn!("[status] {}", envelope),
            _ => log::info!("[status] {}", envelope),
        }
    }
}

/// Forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl StatusNotifier for ChannelNotifier {
    async fn notify(&self, event: StatusEvent) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.sender.send(event);
    }
}

/// Convenience wrapper with one method per kind of update.
#[derive(Clone)]
pub struct StatusEmitter {
    notifier: Arc<dyn StatusNotifier>,
}

impl StatusEmitter {
    pub fn new(notifier: Arc<dyn StatusNotifier>) -> Self {
        Self { notifier }
    }

    pub fn silent() -> Self {
        Self::new(Arc::new(NoopNotifier))
    }

    pub fn notifier(&self) -> Arc<dyn StatusNotifier> {
        Arc::clone(&self.notifier)
    }

    pub async fn progress_update(&self, description: impl Into<String>) {
        self.notifier.notify(StatusEvent::progress(description)).await;
    }

    pub async fn success_update(&self, description: impl Into<String>) {
        self.notifier.notify(StatusEvent::success(description)).await;
    }

    pub async fn error_update(&self, description: impl Into<String>) {
        self.notifier.notify(StatusEvent::error(description)).await;
    }

    pub async fn interim_error_update(&self, description: impl Into<String>) {
        self.notifier
            .notify(StatusEvent::interim_error(description))
            .await;
    }
}

impl std::fmt::Debug for StatusEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusEmitter").finish_non_exhaustive()
    }
}
