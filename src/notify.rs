//! User-facing notification channel
//!
//! Corner-toast style: every success and failure outcome is reported here,
//! fire-and-forget. Sends are never awaited and never retried; a closed
//! receiver is silently ignored.

use tokio::sync::mpsc;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

/// One toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

/// Fire-and-forget sender half of the notification channel
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Create a notifier and the receiver the UI layer drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, title: &str, description: &str) {
        self.send(title, description, Variant::Default);
    }

    pub fn notify_destructive(&self, title: &str, description: &str) {
        self.send(title, description, Variant::Destructive);
    }

    fn send(&self, title: &str, description: &str, variant: Variant) {
        let _ = self.tx.send(Notification {
            title: title.to_string(),
            description: description.to_string(),
            variant,
        });
    }
}
