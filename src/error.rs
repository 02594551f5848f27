/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification of a [`ClientError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// The request never produced an HTTP response (connect, timeout, body).
    Network,
    /// The server answered with a non-success status.
    Status,
    Decode,
    Config,
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Network,
            Self::Http { .. } => FailureKind::Status,
            Self::Decode(_) => FailureKind::Decode,
            Self::Config(_) => FailureKind::Config,
        }
    }

    /// HTTP status of a [`ClientError::Http`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
