//! Request description passed to the executor.

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumString};

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single call against the backend: path relative to the base URL, method
/// and optional JSON body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// Path relative to the configured base URL, with or without a leading `/`.
    pub path: String,
    /// HTTP method; GET unless set.
    pub method: Method,
    /// JSON body, sent only when present.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// GET request for a path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// DELETE request for a path.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Delete,
            body: None,
        }
    }

    /// POST request with a JSON body.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> serde_json::Result<Self> {
        Ok(Self {
            path: path.into(),
            method: Method::Post,
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// PUT request with a JSON body.
    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> serde_json::Result<Self> {
        Ok(Self {
            path: path.into(),
            method: Method::Put,
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// Path without leading slashes, ready to join onto a base URL.
    pub fn relative_path(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}
