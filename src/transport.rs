use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{self, HeaderName, HeaderValue};

use crate::{ClientError, RequestBody, RequestDescriptor, Response, Result};

/// Sends one request and returns one response or failure.
///
/// Implementations report non-success statuses as [`ClientError::Http`] and
/// network-level failures as [`ClientError::Transport`].
pub trait Transport {
    fn issue(&self, request: &RequestDescriptor) -> impl Future<Output = Result<Response>> + Send;

    /// Replaces the timeout applied to each request without its own timeout.
    /// Transports without a configurable timeout ignore it.
    fn set_timeout(&mut self, _timeout: Duration) {}
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Option<String>,
    authorization: Option<String>,
    default_timeout: Duration,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<redacted>"),
            )
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_http_client(reqwest::Client::new())
    }

    /// Uses a preconfigured `reqwest::Client` (proxies, TLS roots, pools).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: None,
            authorization: None,
            default_timeout: Duration::from_millis(10_000),
        }
    }

    /// Sets the URL that relative descriptor paths are joined onto.
    ///
    /// Example: base `"https://api.example.com/api/"` and path `"/displays"`
    /// resolve to `"https://api.example.com/api/displays"`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sends `authorization` verbatim as the `Authorization` header.
    pub fn with_raw_auth(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    /// Sends a bearer token. The `Bearer ` prefix is added when missing.
    pub fn with_bearer(self, token: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer_authorization(token.as_ref());
        self.with_raw_auth(authorization)
    }

    /// Timeout applied to requests without their own timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }

    fn resolve_url(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_owned());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            )),
            None => Err(ClientError::Config(format!(
                "relative url '{url}' requires a base url"
            ))),
        }
    }

    fn build(&self, request: &RequestDescriptor) -> Result<reqwest::RequestBuilder> {
        let url = self.resolve_url(request.url())?;
        let mut builder = self
            .http
            .request(request.method().clone(), url)
            .timeout(request.timeout_override().unwrap_or(self.default_timeout));

        if let Some(authorization) = &self.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                ClientError::Config(format!("invalid header name '{name}': {err}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|err| {
                ClientError::Config(format!("invalid value for header '{name}': {err}"))
            })?;
            builder = builder.header(name, value);
        }

        builder = match request.body_ref() {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Text(body)) => builder.body(body.clone()),
            None => builder,
        };
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    fn set_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    async fn issue(&self, request: &RequestDescriptor) -> Result<Response> {
        let builder = self.build(request)?;

        #[cfg(feature = "tracing")]
        let started = std::time::Instant::now();

        let response = builder.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.text().await.map_err(ClientError::Transport)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method(),
            url = request.url(),
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "http exchange"
        );

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Response {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
