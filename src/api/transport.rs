//! HTTP transport for the student REST service.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::request::ApiRequest;
use crate::config::Config;
use crate::error::{ApiError, AppError};

/// Something that can perform an [`ApiRequest`] and hand back the JSON payload.
///
/// `HttpTransport` is the real implementation; tests use
/// [`MockTransport`](super::mock::MockTransport).
pub trait Transport: Send + Sync {
    /// Perform the request. An empty success body is `Value::Null`.
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

/// Error payload shape the backend uses for failures.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// reqwest-backed transport bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the configured student API.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_base_url(&config.student_api_url, config.http_timeout_ms)
    }

    /// Create a transport for an arbitrary base URL.
    pub fn with_base_url(base_url: &str, timeout_ms: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_millis(timeout_ms.min(2_000)))
            .build()?;

        Ok(Self::from_client(http, base_url)?)
    }

    /// Wrap an existing client, sharing its connection pool.
    pub fn from_client(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: normalize_base(base_url)?,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a request path.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        self.base_url
            .join(request.relative_path())
            .map_err(|e| ApiError::Transport(format!("invalid request path {:?}: {e}", request.path)))
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(request)?;

        let mut builder = self.http.request(request.method.into(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = %status, len = bytes.len(), "Response received");

        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send {
        self.send(request)
    }
}

/// Ensure the base ends in `/` so `join` appends instead of replacing the
/// last segment.
fn normalize_base(base_url: &str) -> Result<Url, url::ParseError> {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.message);

    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_without_trailing_slash_joins_cleanly() {
        let transport = HttpTransport::with_base_url("http://localhost:8080", 1_000).unwrap();
        let url = transport.url_for(&ApiRequest::get("getAll")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/getAll");
    }

    #[test]
    fn base_path_is_kept() {
        let transport = HttpTransport::with_base_url("http://localhost:8080/api", 1_000).unwrap();
        let url = transport.url_for(&ApiRequest::delete("/delete/4")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/delete/4");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(HttpTransport::with_base_url("::nope", 1_000).is_err());
    }

    #[test]
    fn status_error_extracts_server_message() {
        let err = status_error(StatusCode::BAD_REQUEST, br#"{"message":"email taken"}"#);
        assert_eq!(err.user_message(), "email taken");
    }

    #[test]
    fn status_error_without_json_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(
            err,
            ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: None,
            }
        );
        assert_eq!(err.user_message(), "request failed with status code 502");
    }
}
