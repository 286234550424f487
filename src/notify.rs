use std::time::{Duration, Instant};

/// Visual variant of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotifyKind,
    pub message: String,
}

/// Single-slot transient banner: at most one notification is live at a time,
/// a new post replaces the old, and the slot auto-clears after a fixed TTL.
/// No queue, no stacking.
#[derive(Debug)]
pub struct Notifier {
    slot: Option<(Notification, Instant)>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(5))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    pub fn info(&mut self, message: impl Into<String>) -> Notification {
        self.post(NotifyKind::Info, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Notification {
        self.post(NotifyKind::Error, message)
    }

    fn post(&mut self, kind: NotifyKind, message: impl Into<String>) -> Notification {
        let notification = Notification {
            kind,
            message: message.into(),
        };
        self.slot = Some((notification.clone(), Instant::now()));
        notification
    }

    /// The currently visible notification, if any. Expired entries are
    /// dropped on read rather than by a background timer.
    pub fn current(&mut self) -> Option<&Notification> {
        if let Some((_, shown_at)) = &self.slot {
            if shown_at.elapsed() >= self.ttl {
                self.slot = None;
            }
        }
        self.slot.as_ref().map(|(n, _)| n)
    }

    /// Explicit user dismissal.
    pub fn dismiss(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_replaces_existing_notification() {
        let mut notifier = Notifier::new();
        notifier.error("first");
        notifier.info("second");

        let current = notifier.current().unwrap();
        assert_eq!(current.kind, NotifyKind::Info);
        assert_eq!(current.message, "second");
    }

    #[test]
    fn dismiss_clears_the_slot() {
        let mut notifier = Notifier::new();
        notifier.info("hello");
        notifier.dismiss();
        assert!(notifier.current().is_none());
    }

    #[test]
    fn expired_notification_is_dropped_on_read() {
        let mut notifier = Notifier::with_ttl(Duration::ZERO);
        notifier.info("gone already");
        assert!(notifier.current().is_none());
    }

    #[test]
    fn notification_survives_within_ttl() {
        let mut notifier = Notifier::with_ttl(Duration::from_secs(60));
        notifier.error("still here");
        assert!(notifier.current().is_some());
    }
}
