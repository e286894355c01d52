pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Timing and buffer sizes for the dashboard, organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the activity event channel.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Buffer size of the orchestrator inbox (ticks, polls, completions).
    pub const INBOX_QUEUE_SIZE: usize = 64;

    /// Buffer size of the user action channel.
    pub const ACTION_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // COUNTDOWN CONFIGURATION
    // =============================================================================

    pub mod countdown {
        use std::time::Duration;

        /// Interval between rebalances unless the operator changes it (1 hour).
        pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

        /// One countdown tick.
        pub const TICK_INTERVAL_MS: u64 = 1000;

        pub const fn tick_interval() -> Duration {
            Duration::from_millis(TICK_INTERVAL_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    pub mod polling {
        use std::time::Duration;

        /// Period of the background status poll.
        pub const STATUS_POLL_INTERVAL_MS: u64 = 10_000;

        pub const fn status_poll_interval() -> Duration {
            Duration::from_millis(STATUS_POLL_INTERVAL_MS)
        }
    }

    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Status, refresh and language requests.
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// The server fetches balances and places orders before answering.
        pub const REBALANCE_TIMEOUT_SECS: u64 = 600;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }

        pub const fn rebalance_timeout() -> Duration {
            Duration::from_secs(REBALANCE_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // UI CONFIGURATION
    // =============================================================================

    pub mod ui {
        use std::time::Duration;

        /// How long a notification stays on screen.
        pub const NOTIFICATION_TTL_MS: u64 = 5000;

        /// How long the total value stays highlighted after it changed.
        pub const FLASH_DURATION_MS: u64 = 500;

        /// Frame poll timeout of the TUI loop.
        pub const FRAME_POLL_MS: u64 = 100;

        pub const fn notification_ttl() -> Duration {
            Duration::from_millis(NOTIFICATION_TTL_MS)
        }

        pub const fn flash_duration() -> Duration {
            Duration::from_millis(FLASH_DURATION_MS)
        }

        pub const fn frame_poll() -> Duration {
            Duration::from_millis(FRAME_POLL_MS)
        }
    }

    // =============================================================================
    // SERVER DEFAULTS
    // =============================================================================

    /// Dashboard address used when nothing else is configured.
    pub const LOCAL_BASE_URL: &str = "http://127.0.0.1:8000/";

    /// Environment variable naming the dashboard environment (`local` or a URL).
    pub const ENVIRONMENT_VAR: &str = "DASHBOARD_ENVIRONMENT";
}
