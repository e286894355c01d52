//! Read-only snapshot of the dashboard published to the UI

use crate::countdown::Phase;
use crate::notifications::Notification;
use crate::portfolio::{Flash, RenderedPortfolio};
use serde_json::Value;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Translated countdown line.
    pub timer_text: String,
    pub remaining_secs: u64,
    pub default_interval_secs: u64,
    pub phase: Phase,
    pub paused: bool,
    /// A rebalance call is outstanding.
    pub rebalancing: bool,
    /// A user-requested refresh is outstanding.
    pub refreshing: bool,
    pub portfolio: Option<RenderedPortfolio>,
    /// Until when the total-value flash stays visible.
    pub flash_until: Option<Instant>,
    /// Last rebalance record, pretty-printed.
    pub rebalance_log: Option<String>,
    pub notifications: Vec<Notification>,
    pub trader_running: Option<bool>,
    pub dry_run_mode: Option<bool>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            timer_text: String::new(),
            remaining_secs: 0,
            default_interval_secs: 0,
            phase: Phase::Idle,
            paused: false,
            rebalancing: false,
            refreshing: false,
            portfolio: None,
            flash_until: None,
            rebalance_log: None,
            notifications: Vec::new(),
            trader_running: None,
            dry_run_mode: None,
        }
    }
}

impl DashboardView {
    /// Flash cue to draw at `now`, if any.
    pub fn flash_at(&self, now: Instant) -> Option<Flash> {
        match (self.flash_until, &self.portfolio) {
            (Some(until), Some(portfolio)) if now < until => portfolio.flash,
            _ => None,
        }
    }

    /// Notifications that have not expired at `now`.
    pub fn visible_notifications(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(move |n| !n.is_expired(now))
    }

    pub(crate) fn set_rebalance_log(&mut self, record: &Value) {
        let pretty = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
        self.rebalance_log = Some(pretty);
    }
}
