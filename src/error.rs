// src/error.rs

use std::fmt;

/// Global Client Error Enum.
/// Every failure the client can observe is funneled into one of these variants,
/// whether it came from the transport, the API envelope, or local validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    // Request never produced a response (timeout, refused connection, DNS)
    Network(String),

    // Server answered with a non-success status or `success: false`
    Api { status: u16, message: String },

    // 404
    NotFound(String),

    // 401 / 403
    Unauthorized(String),

    // Local input rejected before any request was sent
    Validation(String),

    // Response body could not be decoded
    Decode(String),

    // Local persistence (session file) failed
    Storage(String),

    // Operation not allowed in the current state
    InvalidState(String),
}

impl ClientError {
    /// Builds the variant matching an HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// Human readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Network(msg)
            | ClientError::NotFound(msg)
            | ClientError::Unauthorized(msg)
            | ClientError::Validation(msg)
            | ClientError::Decode(msg)
            | ClientError::Storage(msg)
            | ClientError::InvalidState(msg) => msg,
            ClientError::Api { message, .. } => message,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
            ClientError::Api { status, message } => write!(f, "server error ({}): {}", status, message),
            ClientError::NotFound(msg) => write!(f, "not found: {}", msg),
            ClientError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ClientError::Validation(msg) => write!(f, "invalid input: {}", msg),
            ClientError::Decode(msg) => write!(f, "unexpected response: {}", msg),
            ClientError::Storage(msg) => write!(f, "storage error: {}", msg),
            ClientError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Converts `reqwest::Error` into the transport or decode category.
/// Allows using `?` operator on HTTP calls.
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Validation(format!("invalid url: {}", err))
    }
}
