//! `signage-http` is an async HTTP client for the signage dashboard API
//! (displays, advertisements, display loops).
//!
//! [`ResilientClient`] wraps a [`Transport`] and re-issues failed requests
//! with exponential backoff:
//! - [`ResilientClient::issue`] for any [`RequestDescriptor`]
//! - [`ResilientClient::get_json`], [`ResilientClient::post_json`],
//!   [`ResilientClient::put_json`], [`ResilientClient::delete`]
//!
//! With the default [`ClientOptions`] a failing call is attempted three
//! times, waiting 1s and then 2s between attempts.

mod client;
mod error;
mod options;
mod request;
mod response;
mod retry;
mod transport;

pub use client::ResilientClient;
pub use error::{ClientError, FailureKind};
pub use options::ClientOptions;
pub use request::{RequestBody, RequestDescriptor};
pub use response::Response;
pub use retry::{backoff_delay, RetryMode};
pub use transport::{ReqwestTransport, Transport};

pub type Result<T> = std::result::Result<T, ClientError>;
