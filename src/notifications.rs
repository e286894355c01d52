//! Transient user notifications
//!
//! Every notification lives for a fixed time after it is raised. Items stack in
//! arrival order with no deduplication and no cap; growth is bounded only by the
//! expiry window.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✕",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    items: VecDeque<Notification>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    /// Raise a notification; it is appended after any still-visible ones.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> &Notification {
        let notification = Notification {
            message: message.into(),
            severity,
            expires_at: Instant::now() + self.ttl,
        };
        self.items.push_back(notification);
        // Just pushed, so the queue is non-empty.
        &self.items[self.items.len() - 1]
    }

    /// Drop everything whose time is up.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    /// Notifications still visible at `now`, oldest first.
    pub fn visible(&mut self, now: Instant) -> Vec<Notification> {
        self.prune(now);
        self.items.iter().cloned().collect()
    }
}
