//! Uniform outcome of a remote call

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one remote call: the decoded `data` payload or a classified failure
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Classification of a failed remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No token provider is registered, or it produced no token
    AuthUnavailable,
    /// The token provider never became ready within the wait window
    AuthTimeout,
    /// 401/403 that survived the bounded recovery retry
    Unauthorized,
    /// Network-level failure, no response received
    Transport,
    /// Non-2xx response other than 401/403
    HttpError { status: u16 },
    /// 2xx response whose envelope reported `success: false`
    ApiError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::AuthUnavailable => write!(f, "AuthUnavailable"),
            ErrorKind::AuthTimeout => write!(f, "AuthTimeout"),
            ErrorKind::Unauthorized => write!(f, "Unauthorized"),
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::HttpError { status } => write!(f, "HttpError({})", status),
            ErrorKind::ApiError => write!(f, "ApiError"),
        }
    }
}

/// A classified failure with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn auth_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthUnavailable, message)
    }

    pub fn auth_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthTimeout, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn http(status: u16) -> Self {
        Self::new(
            ErrorKind::HttpError { status },
            format!("Request failed with HTTP status {}", status),
        )
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiError, message)
    }

    /// HTTP status carried by an `HttpError`, if any
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::HttpError { status } => Some(status),
            _ => None,
        }
    }
}
