use crate::RetryMode;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds, handed to the transport by
    /// [`ResilientClient::with_options`](crate::ResilientClient::with_options).
    /// `None` keeps the transport's own timeout.
    pub timeout_ms: Option<u64>,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds, doubled on every further retry.
    pub retry_backoff_ms: u64,
    /// Which failures are eligible for a retry.
    pub retry_mode: RetryMode,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_retries: 2,
            retry_backoff_ms: 1_000,
            retry_mode: RetryMode::Permissive,
        }
    }
}
