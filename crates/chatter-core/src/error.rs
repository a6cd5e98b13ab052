//! Error types for calls made against the chat platform.

use thiserror::Error;

/// Errors returned by a [`Session`](crate::Session) when a platform call fails.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The session is not connected to the platform.
    #[error("session is not connected")]
    NotConnected,

    /// The platform did not answer in time.
    #[error("platform call timed out")]
    Timeout,

    /// The requested object does not exist (or is missing from the cache).
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up, e.g. `"role"`.
        kind: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The platform rejected the request.
    #[error("platform rejected request ({code}): {message}")]
    Rejected {
        /// Platform-specific error code.
        code: i32,
        /// Human readable reason.
        message: String,
    },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates a not-found error for the given object kind.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a catch-all error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for platform calls.
pub type ApiResult<T> = Result<T, ApiError>;
