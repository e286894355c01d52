use crate::api::error::ApiError;
use crate::api::types::{RebalanceResponse, RefreshResponse, StatusResponse};
use crate::i18n::Language;

pub(crate) mod client;
pub use client::{Endpoints, StatusClient};
pub mod error;
pub mod error_handler;
pub mod types;

#[cfg(test)]
use mockall::automock;

/// The dashboard server as seen by this client.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Current countdown, portfolio and last rebalance.
    async fn fetch_status(&self) -> Result<StatusResponse, ApiError>;

    /// Ask the server to re-read balances from the exchange.
    async fn refresh_portfolio(&self) -> Result<RefreshResponse, ApiError>;

    /// Run a rebalance on the server.
    async fn trigger_rebalance(&self) -> Result<RebalanceResponse, ApiError>;

    /// Store the language preference in the server session.
    async fn set_language(&self, language: Language, next: &str) -> Result<(), ApiError>;
}
