//! Error types for the Chatter framework.

use thiserror::Error;

/// Why a [`DeadlineHandle`](crate::DeadlineHandle) is no longer live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeadlineError {
    /// The handle was cancelled explicitly.
    #[error("dispatch cancelled")]
    Cancelled,

    /// The dispatch timeout elapsed.
    #[error("dispatch deadline exceeded")]
    Expired,
}
