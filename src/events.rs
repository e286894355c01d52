//! Event System
//!
//! Activity events emitted by the dashboard components. The TUI keeps a
//! rolling activity log of them, headless mode prints them.

use crate::logging::{LogLevel, should_log_with_env};
use crate::notifications::Severity;
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// Countdown controller and its tick source.
    Countdown,
    /// Status polling and portfolio refresh.
    Status,
    /// Manual or countdown-triggered rebalancing.
    Rebalance,
    /// User-facing notifications.
    Notice,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    /// Event mirroring a notification shown to the user.
    pub fn notice(msg: String, severity: Severity) -> Self {
        let (event_type, log_level) = match severity {
            Severity::Success => (EventType::Success, LogLevel::Info),
            Severity::Error => (EventType::Error, LogLevel::Error),
            Severity::Warning => (EventType::Error, LogLevel::Warn),
            Severity::Info => (EventType::Refresh, LogLevel::Info),
        };
        Self::new(Source::Notice, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Cloneable handle for publishing events; a closed receiver is not an error.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send_event(&self, event: Event) {
        crate::logging::emit(event.log_level, &event.msg);
        let _ = self.sender.send(event).await;
    }

    pub async fn send(&self, source: Source, msg: String, event_type: EventType, level: LogLevel) {
        self.send_event(Event::new(source, msg, event_type, level))
            .await;
    }
}
