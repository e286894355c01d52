//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::notifications::Severity;
use crate::portfolio::Flash;
use ratatui::prelude::Color;

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Countdown => Color::Cyan,
        Source::Status => Color::LightBlue,
        Source::Rebalance => Color::Yellow,
        Source::Notice => Color::Gray,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}

pub fn flash_color(flash: Flash) -> Color {
    match flash {
        Flash::Up => Color::LightGreen,
        Flash::Down => Color::LightRed,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.starts_with("Reqwest error") {
        if msg.contains("timed out") {
            return "Request timed out - retrying on next poll".to_string();
        }
        if msg.contains("connect") {
            return "Dashboard server unreachable - retrying on next poll".to_string();
        }
        return "Network error - retrying on next poll".to_string();
    }
    msg.to_string()
}

/// Share of the interval already elapsed, as a gauge percentage.
pub fn elapsed_percent(remaining_secs: u64, interval_secs: u64) -> u16 {
    if interval_secs == 0 || remaining_secs >= interval_secs {
        return 0;
    }
    let elapsed = interval_secs - remaining_secs;
    ((elapsed as f64 / interval_secs as f64) * 100.0) as u16
}
