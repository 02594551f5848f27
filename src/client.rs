use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;

use crate::{
    retry::backoff_delay, ClientError, ClientOptions, ReqwestTransport, RequestDescriptor,
    Response, Result, Transport,
};

/// Retry bookkeeping for one logical call. Lives only inside
/// [`ResilientClient::issue`], so concurrent calls never share it.
#[derive(Debug, Default)]
struct CallState {
    attempts: usize,
}

impl CallState {
    /// Records a failed attempt and returns its 1-based number.
    fn record_failure(&mut self) -> usize {
        self.attempts += 1;
        self.attempts
    }
}

/// HTTP client that re-issues failed requests with exponential backoff.
///
/// Wraps any [`Transport`]; callers only observe retries as added latency.
#[derive(Clone, Debug)]
pub struct ResilientClient<T = ReqwestTransport> {
    transport: T,
    options: ClientOptions,
}

impl ResilientClient<ReqwestTransport> {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(ReqwestTransport::new().with_base_url(base_url))
    }

    /// Creates a client that sends `token` as a bearer token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added automatically.
    pub fn new_bearer(base_url: impl Into<String>, token: impl AsRef<str>) -> Self {
        Self::with_transport(
            ReqwestTransport::new()
                .with_base_url(base_url)
                .with_bearer(token),
        )
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `SIGNAGE_API_URL` — API base URL (required)
    /// - `SIGNAGE_API_TOKEN` — bearer token (optional)
    /// - `SIGNAGE_API_MAX_RETRIES`, `SIGNAGE_API_RETRY_BACKOFF_MS`,
    ///   `SIGNAGE_API_TIMEOUT_MS` — override [`ClientOptions`] defaults
    ///
    /// # Example
    ///
    /// ```no_run
    /// use signage_http::ResilientClient;
    ///
    /// let api = ResilientClient::from_env().expect("missing SIGNAGE_API_URL");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("SIGNAGE_API_URL").ok_or_else(|| {
            ClientError::Config("missing SIGNAGE_API_URL environment variable".to_owned())
        })?;
        if url.trim().is_empty() {
            return Err(ClientError::Config(
                "SIGNAGE_API_URL is set but empty".to_owned(),
            ));
        }

        let mut options = ClientOptions::default();
        if let Some(max_retries) = parse_var(&lookup, "SIGNAGE_API_MAX_RETRIES")? {
            options.max_retries = max_retries;
        }
        if let Some(backoff) = parse_var(&lookup, "SIGNAGE_API_RETRY_BACKOFF_MS")? {
            if backoff == 0 {
                return Err(ClientError::Config(
                    "SIGNAGE_API_RETRY_BACKOFF_MS must be greater than zero".to_owned(),
                ));
            }
            options.retry_backoff_ms = backoff;
        }
        options.timeout_ms = parse_var(&lookup, "SIGNAGE_API_TIMEOUT_MS")?;

        let client = match lookup("SIGNAGE_API_TOKEN").filter(|token| !token.trim().is_empty()) {
            Some(token) => Self::new_bearer(url.trim(), token),
            None => Self::new(url.trim()),
        };
        Ok(client.with_options(options))
    }
}

impl<T: Transport> ResilientClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as timeout and retry behavior.
    ///
    /// A `timeout_ms` is handed to the transport; requests themselves are
    /// passed through unchanged.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        if let Some(timeout_ms) = opts.timeout_ms {
            self.transport.set_timeout(Duration::from_millis(timeout_ms));
        }
        self.options = opts;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues `request`, retrying failures until one attempt succeeds or the
    /// retry budget is spent.
    ///
    /// Returns the transport's response or its last error unchanged.
    pub async fn issue(&self, request: &RequestDescriptor) -> Result<Response> {
        let mut state = CallState::default();

        loop {
            let err = match self.transport.issue(request).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let attempt = state.record_failure();
            if attempt > self.options.max_retries
                || !self.options.retry_mode.allows(request, &err)
            {
                #[cfg(feature = "tracing")]
                if attempt > 1 {
                    tracing::warn!(
                        method = %request.method(),
                        url = request.url(),
                        attempts = attempt,
                        error = %err,
                        "request failed after retries"
                    );
                }
                return Err(err);
            }

            let delay = backoff_delay(self.options.retry_backoff_ms, attempt);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method(),
                url = request.url(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying request"
            );

            sleep(delay).await;
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.issue(&RequestDescriptor::get(path)).await
    }

    /// Fetches `path` and decodes the JSON body.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.get(path).await?.json()
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let request = RequestDescriptor::post(path).json(to_json_body(body)?);
        self.issue(&request).await
    }

    pub async fn put_json<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let request = RequestDescriptor::put(path).json(to_json_body(body)?);
        self.issue(&request).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.issue(&RequestDescriptor::delete(path)).await
    }
}

impl<T: Transport + Sync> Transport for ResilientClient<T> {
    async fn issue(&self, request: &RequestDescriptor) -> Result<Response> {
        Self::issue(self, request).await
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.transport.set_timeout(timeout);
    }
}

fn to_json_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|err| {
        ClientError::Config(format!("request body cannot be serialized: {err}"))
    })
}

fn parse_var<N>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<N>>
where
    N: FromStr,
    N::Err: Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<N>()
            .map(Some)
            .map_err(|err| ClientError::Config(format!("{name} must be a number: {err}"))),
    }
}
