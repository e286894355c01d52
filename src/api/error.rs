//! Error handling for the dashboard server API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not the JSON we expected.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The server handled the request but reported `status != "ok"`.
    #[error("{0}")]
    Application(String),

    /// The session cookie is missing or expired; the server sent us to its login page.
    #[error("Session expired or missing: redirected to {0}")]
    LoginRequired(String),

    /// No CSRF token could be found for a form submission.
    #[error("CSRF token not available; set one with `configure --csrf-token`")]
    MissingCsrfToken,
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }
}
