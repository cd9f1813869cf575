//! Unified error types for the student client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::student::Field;

/// Message stored when a failure carries no usable text at all.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Unified error type for the student client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration value rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed base or service URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client-side route error.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// View operation error.
    #[error("view error: {0}")]
    View(#[from] ViewError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures at the request boundary.
///
/// These never reach view rendering directly: the request executor converts
/// them into a stored message via [`ApiError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached or the connection broke.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status code {}", .status.as_u16())]
    Status {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// `message` field of the backend's JSON error payload, if any.
        message: Option<String>,
    },

    /// The payload did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The issuing view was cancelled before the response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Human-readable message for the error panel.
    ///
    /// Prefers the server's own message, then the error's display text, then
    /// [`FALLBACK_ERROR_MESSAGE`]. Never returns an empty string.
    pub fn user_message(&self) -> String {
        if let ApiError::Status {
            message: Some(message),
            ..
        } = self
        {
            if !message.trim().is_empty() {
                return message.clone();
            }
        }

        let text = self.to_string();
        if text.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            text
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Local form validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("{0} is required")]
    MissingField(Field),

    /// A numeric field did not hold a valid number.
    #[error("{field} must be a positive number, got {value:?}")]
    InvalidNumber {
        /// The offending field.
        field: Field,
        /// The raw input.
        value: String,
    },

    /// The course label is not one of the offered options.
    #[error("unknown course {0:?}")]
    UnknownCourse(String),
}

/// Errors returned by view operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The draft failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request failed; carries the message stored by the executor.
    #[error("{0}")]
    Request(String),

    /// No record with this id in the edit slot or the shared list.
    #[error("student {0} not found")]
    StudentNotFound(i64),

    /// The view was unmounted before the request resolved.
    #[error("view cancelled")]
    Cancelled,
}

/// Client-side routing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route matches the path.
    #[error("no route matches {0:?}")]
    NotFound(String),

    /// The `:id` segment is not an integer.
    #[error("invalid student id {0:?}")]
    InvalidId(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: Some("Student not found with id 9".to_string()),
        };
        assert_eq!(err.user_message(), "Student not found with id 9");
    }

    #[test]
    fn blank_server_message_falls_back_to_status_text() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("   ".to_string()),
        };
        assert_eq!(err.user_message(), "request failed with status code 500");
    }

    #[test]
    fn transport_message_is_used() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn empty_transport_message_uses_fallback() {
        let err = ApiError::Transport(String::new());
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }
}
