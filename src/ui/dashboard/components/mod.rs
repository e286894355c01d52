//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod footer;
pub mod header;
pub mod logs;
pub mod notifications;
pub mod portfolio;
pub mod rebalance_log;
