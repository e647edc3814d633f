// ── Notification fan-out ──
//
// Views and the live-update task raise transient, user-visible messages
// through a `Notifier`. Front ends subscribe and render them however they
// like (the CLI prints them to stderr).

use serde::Serialize;
use strum::Display;
use tokio::sync::broadcast;
use tracing::debug;

const NOTIFICATION_CHANNEL_SIZE: usize = 256;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, msg: impl Into<String>) -> Self {
        Self {
            level,
            message: msg.into(),
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, msg)
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, msg)
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, msg)
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, msg)
    }

    pub fn critical(msg: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Critical, msg)
    }
}

/// Broadcast sink for notifications. Cheap to clone; every clone feeds the
/// same subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        Self { tx }
    }

    /// Deliver to every current subscriber. Dropped silently when nobody
    /// is listening.
    pub fn notify(&self, notification: Notification) {
        debug!(level = %notification.level, message = %notification.message, "notification");
        let _ = self.tx.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

/// Collect everything currently queued on a receiver without waiting.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(n) => out.push(n),
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::info("one"));
        notifier.notify(Notification::critical("two"));

        let got = drain(&mut rx);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].level, NotificationLevel::Info);
        assert_eq!(got[1].message, "two");
    }

    #[test]
    fn notify_without_subscribers_is_a_no_op() {
        Notifier::new().notify(Notification::error("nobody listening"));
    }
}
