// --- File: crates/bookit_widget/src/notify.rs ---
//! Transient feedback: notifications and the progress loader.

use bookit_config::NotificationConfig;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

use crate::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
}

/// How long a notification stays up unless dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// The surface's default for the notification's kind.
    Default,
    For(Duration),
    /// Stays until explicitly dismissed.
    Persistent,
}

pub type NotificationId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
}

/// Where the widget reports to the visitor.
pub trait FeedbackSurface: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str, lifetime: Lifetime) -> NotificationId;
    fn dismiss(&self, id: NotificationId);
    /// Shows the loader, or replaces its text if already shown.
    fn show_progress(&self, message: &str);
    fn hide_progress(&self);
}

#[derive(Default)]
struct Inner {
    next_id: NotificationId,
    active: Vec<Notification>,
    progress: Option<String>,
}

/// In-memory feedback surface a host renders from.
///
/// Notifications coexist without de-duplication. Timed ones are removed by a
/// task on the current tokio runtime; outside a runtime they stay until
/// dismissed.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Inner>>,
    error_after: Duration,
    success_after: Duration,
}

impl NotificationCenter {
    pub fn new(error_after: Duration, success_after: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            error_after,
            success_after,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(
            Duration::from_millis(config.error_ms),
            Duration::from_millis(config.success_ms),
        )
    }

    /// Notifications currently on screen, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        lock(&self.inner).active.clone()
    }

    /// Text of the loader, `None` while hidden.
    pub fn progress(&self) -> Option<String> {
        lock(&self.inner).progress.clone()
    }

    fn display_time(&self, kind: NotificationKind, lifetime: Lifetime) -> Option<Duration> {
        match lifetime {
            Lifetime::Default => Some(match kind {
                NotificationKind::Error => self.error_after,
                NotificationKind::Success => self.success_after,
            }),
            Lifetime::For(after) => Some(after),
            Lifetime::Persistent => None,
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

impl FeedbackSurface for NotificationCenter {
    fn notify(&self, kind: NotificationKind, message: &str, lifetime: Lifetime) -> NotificationId {
        let id = {
            let mut inner = lock(&self.inner);
            inner.next_id += 1;
            let id = inner.next_id;
            inner.active.push(Notification {
                id,
                kind,
                message: message.to_string(),
            });
            id
        };
        debug!("Notification {} ({:?}): {}", id, kind, message);

        if let Some(after) = self.display_time(kind, lifetime) {
            match Handle::try_current() {
                Ok(handle) => {
                    let center = self.clone();
                    handle.spawn(async move {
                        tokio::time::sleep(after).await;
                        center.dismiss(id);
                    });
                }
                Err(_) => debug!("No runtime to auto-dismiss notification {}", id),
            }
        }
        id
    }

    fn dismiss(&self, id: NotificationId) {
        lock(&self.inner).active.retain(|n| n.id != id);
    }

    fn show_progress(&self, message: &str) {
        lock(&self.inner).progress = Some(message.to_string());
    }

    fn hide_progress(&self) {
        lock(&self.inner).progress = None;
    }
}

/// Steps the loader through progress messages while a request is outstanding.
///
/// The first message shows immediately, each following one after another
/// `interval`; the last one stays up. Stopping or dropping the ticker hides
/// the loader.
pub struct ProgressTicker {
    surface: Arc<dyn FeedbackSurface>,
    task: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Must be called from within a tokio runtime.
    pub fn start(surface: Arc<dyn FeedbackSurface>, messages: Vec<String>, interval: Duration) -> Self {
        surface.show_progress(messages.first().map(String::as_str).unwrap_or_default());

        // interval_at rejects a zero period
        let interval = interval.max(Duration::from_millis(1));
        let task_surface = surface.clone();
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + interval, interval);
            for message in messages.iter().skip(1) {
                ticks.tick().await;
                task_surface.show_progress(message);
            }
        });

        Self {
            surface,
            task: Some(task),
        }
    }

    pub fn stop(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.surface.hide_progress();
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.finish();
    }
}
