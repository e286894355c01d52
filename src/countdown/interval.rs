//! Day/hour/minute/second intervals as typed by the operator.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("empty interval")]
    Empty,
    #[error("invalid interval component '{0}'")]
    InvalidComponent(String),
    #[error("unknown unit '{0}' (use d, h, m or s)")]
    UnknownUnit(char),
    #[error("interval too large")]
    Overflow,
    #[error("interval must be at least one second")]
    Zero,
}

impl Interval {
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Normalized split of a second count.
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(SECS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE))
            .saturating_add(self.seconds)
    }

    fn checked_total(&self) -> Option<u64> {
        self.days
            .checked_mul(SECS_PER_DAY)?
            .checked_add(self.hours.checked_mul(SECS_PER_HOUR)?)?
            .checked_add(self.minutes.checked_mul(SECS_PER_MINUTE)?)?
            .checked_add(self.seconds)
    }

    /// `1d2h30m`, `1d 2h 30m 15s` style input.
    fn parse_units(s: &str) -> Result<Self, IntervalError> {
        let mut interval = Interval::default();
        let mut digits = String::new();
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| IntervalError::InvalidComponent(format!("{}{}", digits, c)))?;
            match c.to_ascii_lowercase() {
                'd' => interval.days = interval.days.saturating_add(value),
                'h' => interval.hours = interval.hours.saturating_add(value),
                'm' => interval.minutes = interval.minutes.saturating_add(value),
                's' => interval.seconds = interval.seconds.saturating_add(value),
                other => return Err(IntervalError::UnknownUnit(other)),
            }
            digits.clear();
        }
        if !digits.is_empty() {
            return Err(IntervalError::InvalidComponent(digits));
        }
        Ok(interval)
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    /// Accepts plain seconds (`90`), four numbers in d h m s order
    /// (`0 0 1 0`), or unit-suffixed parts (`1d 2h 30m`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IntervalError::Empty);
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        let all_numeric = parts
            .iter()
            .all(|p| p.chars().all(|c| c.is_ascii_digit()));

        let interval = if all_numeric {
            let numbers = parts
                .iter()
                .map(|p| {
                    p.parse::<u64>()
                        .map_err(|_| IntervalError::InvalidComponent(p.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            match numbers.as_slice() {
                [secs] => Interval::new(0, 0, 0, *secs),
                [d, h, m, s] => Interval::new(*d, *h, *m, *s),
                _ => return Err(IntervalError::InvalidComponent(s.to_string())),
            }
        } else {
            Self::parse_units(s)?
        };

        interval.checked_total().ok_or(IntervalError::Overflow)?;
        Ok(interval)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
