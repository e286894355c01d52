//! Error classification for dashboard API failures

use crate::api::error::ApiError;
use crate::logging::LogLevel;

#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Expired or missing session - the operator has to act
            ApiError::Http { status, .. } if *status == 401 || *status == 403 => LogLevel::Error,

            // Server errors - temporary issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,

            // The server speaks a different contract than we expect
            ApiError::Decode(_) => LogLevel::Error,
            ApiError::MissingCsrfToken => LogLevel::Error,
            ApiError::LoginRequired(_) => LogLevel::Error,

            // Rebalance/refresh refused by the server
            ApiError::Application(_) => LogLevel::Warn,

            _ => LogLevel::Warn,
        }
    }

    /// Whether the next poll is likely to succeed without operator action.
    pub fn recovers_on_next_poll(&self, error: &ApiError) -> bool {
        match error {
            ApiError::Reqwest(_) => true,
            ApiError::Http { status, .. } => match *status {
                401 | 403 => false,
                429 | 500..=599 => true,
                _ => false,
            },
            ApiError::Decode(_) | ApiError::MissingCsrfToken | ApiError::LoginRequired(_) => false,
            ApiError::Application(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn auth_failures_are_errors() {
        let handler = ErrorHandler::new();
        assert_eq!(handler.classify_error(&http(401)), LogLevel::Error);
        assert_eq!(handler.classify_error(&http(403)), LogLevel::Error);
        assert!(!handler.recovers_on_next_poll(&http(403)));

        let login = ApiError::LoginRequired("http://host/login/".to_string());
        assert_eq!(handler.classify_error(&login), LogLevel::Error);
        assert!(!handler.recovers_on_next_poll(&login));
    }

    #[test]
    fn server_errors_are_warnings() {
        let handler = ErrorHandler::new();
        assert_eq!(handler.classify_error(&http(503)), LogLevel::Warn);
        assert!(handler.recovers_on_next_poll(&http(503)));
        assert_eq!(
            handler.classify_error(&ApiError::Application("busy".to_string())),
            LogLevel::Warn
        );
    }

    #[test]
    fn decode_errors_are_errors() {
        let handler = ErrorHandler::new();
        let err = ApiError::from(serde_json::from_str::<u64>("nope").unwrap_err());
        assert_eq!(handler.classify_error(&err), LogLevel::Error);
        assert!(!handler.recovers_on_next_poll(&err));
    }
}
