//! Backoff computation and retry eligibility.

use std::time::Duration;

use reqwest::Method;

use crate::{ClientError, RequestDescriptor};

/// Selects which failures the client retries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RetryMode {
    /// Every failure reported by the transport is retried, whatever the
    /// method, status or error variant.
    #[default]
    Permissive,
    /// Only idempotent methods are retried, and only for network failures or
    /// transient statuses (408, 429, 500, 502, 503, 504).
    Conservative,
}

impl RetryMode {
    pub fn allows(self, request: &RequestDescriptor, err: &ClientError) -> bool {
        match self {
            Self::Permissive => true,
            Self::Conservative => {
                is_idempotent(request.method()) && is_transient_failure(err)
            }
        }
    }
}

/// Delay before the retry that follows failed attempt `attempt` (1-based):
/// `base_ms * 2^(attempt - 1)`. Attempt 0 has no delay.
pub fn backoff_delay(base_ms: u64, attempt: usize) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    let exp = (attempt - 1).min(16) as u32;
    Duration::from_millis(base_ms.saturating_mul(1u64 << exp))
}

fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::PUT | Method::DELETE | Method::TRACE
    )
}

fn is_transient_failure(err: &ClientError) -> bool {
    match err {
        ClientError::Transport(err) => {
            err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
        }
        ClientError::Http { status, .. } => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
        ClientError::Decode(_) | ClientError::Config(_) => false,
    }
}
