//! # Client Error Types
//!
//! Unified error handling for every Connect API operation. Errors fall into a
//! small closed set: caller input rejected before any I/O, token acquisition
//! failures, and API failures (bad status, undecodable or mis-shaped bodies).
//! Transport errors are always folded into `Auth` or `Api`.

use thiserror::Error;

/// Client operation result type
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Error types for Connect client operations
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {}", describe(.status, .message))]
    Auth {
        status: Option<u16>,
        message: String,
    },

    #[error("API error: {}", describe(.status, .message))]
    Api {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn describe(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{code} - {message}"),
        None => message.to_string(),
    }
}

impl ConnectError {
    /// Create a validation error for rejected caller input
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authentication error
    pub fn auth(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    /// Create an API error without a captured response body
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an API error that keeps the raw response body for diagnostics
    pub fn api_with_body(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Create an API error for a response that decoded but does not have the
    /// shape the operation expects
    pub fn unexpected_response(operation: &str, detail: impl std::fmt::Display) -> Self {
        Self::api(
            None,
            format!("Unexpected response format for {operation}: {detail}"),
        )
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status attached to the error, if the server responded at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectError::Auth { status, .. } | ConnectError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body captured with an API error
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            ConnectError::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, ConnectError::Validation(_))
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, ConnectError::Auth { .. })
    }

    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, ConnectError::Api { .. })
    }

    /// True when the server answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
