//! Countdown to the next rebalance
//!
//! `Countdown` owns the remaining seconds, the pause flag and the in-flight
//! flag. Callers drive it through the operations below; nothing mutates its
//! fields directly. The in-flight flag is the only thing keeping two rebalance
//! calls from overlapping.

pub mod interval;
pub mod source;

pub use interval::{Interval, IntervalError};
pub use source::PeriodicSource;

use crate::i18n::Translations;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, mid-rebalance or already at zero.
    Idle,
    /// Counted down; seconds left.
    Decremented(u64),
    /// Reached zero on this tick; a rebalance is due.
    Expired,
}

/// Who asked for a rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RebalanceTrigger {
    Countdown,
    Manual,
}

/// Observable state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Paused,
    ZeroTriggering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u64,
    default_interval_secs: u64,
    paused: bool,
    rebalance_in_flight: bool,
}

impl Countdown {
    pub fn new(default_interval_secs: u64) -> Self {
        Self {
            remaining_secs: default_interval_secs,
            default_interval_secs,
            paused: false,
            rebalance_in_flight: false,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn default_interval_secs(&self) -> u64 {
        self.default_interval_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn rebalance_in_flight(&self) -> bool {
        self.rebalance_in_flight
    }

    pub fn phase(&self) -> Phase {
        if self.rebalance_in_flight {
            Phase::ZeroTriggering
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Idle
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.paused || self.rebalance_in_flight || self.remaining_secs == 0 {
            return TickOutcome::Idle;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Decremented(self.remaining_secs)
        }
    }

    /// Flip the pause flag. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Change the interval used after the next rebalance; the running countdown is untouched.
    pub fn set_default_interval(&mut self, interval: Interval) -> u64 {
        self.default_interval_secs = interval.total_secs();
        self.default_interval_secs
    }

    /// Jump the countdown. Restarting the tick source is the caller's job.
    pub fn set_next(&mut self, interval: Interval) -> u64 {
        self.remaining_secs = interval.total_secs();
        self.remaining_secs
    }

    /// Restart from the default interval.
    pub fn reset(&mut self) {
        self.remaining_secs = self.default_interval_secs;
    }

    /// Claim the single rebalance slot. `false` means one is already running.
    pub fn try_begin_rebalance(&mut self) -> bool {
        if self.rebalance_in_flight {
            return false;
        }
        self.rebalance_in_flight = true;
        true
    }

    /// Release the rebalance slot. A countdown-triggered rebalance always
    /// restarts the countdown, whatever the outcome.
    pub fn finish_rebalance(&mut self, trigger: RebalanceTrigger) {
        self.rebalance_in_flight = false;
        if trigger == RebalanceTrigger::Countdown || self.remaining_secs == 0 {
            self.reset();
        }
    }

    /// Adopt the server's view of the countdown. `None` leaves it alone, as do
    /// pause and an outstanding rebalance. Returns whether anything changed.
    pub fn merge_remaining(&mut self, remaining: Option<u64>) -> bool {
        match remaining {
            Some(secs) if !self.paused && !self.rebalance_in_flight => {
                self.remaining_secs = secs;
                true
            }
            _ => false,
        }
    }

    /// Human-readable timer line.
    pub fn timer_text(&self, t: &Translations) -> String {
        if self.rebalance_in_flight && self.remaining_secs == 0 {
            return t.get("rebalancingInProgress").to_string();
        }
        if self.remaining_secs == 0 {
            return t.get("rebalanceTimeReached").to_string();
        }
        format!(
            "{}: {}",
            t.get("remaining"),
            Interval::from_secs(self.remaining_secs)
        )
    }
}
