use serde::de::DeserializeOwned;

use crate::{ClientError, Result};

/// A successful HTTP response with its body fully read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Returns the first header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            ClientError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                self.body
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::Response;
    use crate::{ClientError, FailureKind};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Display {
        id: u32,
        name: String,
    }

    #[test]
    fn json_decodes_body() {
        let response = Response::new(200, r#"{"id":3,"name":"Lobby"}"#);
        let display: Display = response.json().expect("body must decode");
        assert_eq!(
            display,
            Display {
                id: 3,
                name: "Lobby".to_owned()
            }
        );
    }

    #[test]
    fn json_failure_is_decode_error() {
        let response = Response::new(200, "<html>");
        let err = response.json::<Display>().expect_err("body is not json");
        assert_eq!(err.kind(), FailureKind::Decode);
        assert!(matches!(err, ClientError::Decode(message) if message.contains("<html>")));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut response = Response::new(200, "");
        response
            .headers
            .push(("content-type".to_owned(), "application/json".to_owned()));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
    }
}
