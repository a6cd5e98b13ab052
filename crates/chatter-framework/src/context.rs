//! Per-dispatch state threaded through the router tree.
//!
//! One [`DispatchContext`] is created by [`Router::bootstrap`](crate::Router::bootstrap)
//! for every incoming message and handed down by mutable reference as the
//! dispatch descends into nested routers. Each level overwrites
//! [`command`](DispatchContext::command) with the keyword it matched and
//! shrinks [`arguments`](DispatchContext::arguments) to the text after it, so
//! a child router only ever sees its own slice of the original message.
//!
//! The context also carries a [`DeadlineHandle`]: an advisory, cancellable
//! deadline computed once from the originating router's timeout. Nothing in
//! the framework aborts a handler when it expires. Handlers doing remote or
//! expensive work are expected to observe it.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::error::DeadlineError;

/// Upper bound used when `now + timeout` does not fit in an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

// =============================================================================
// DeadlineHandle
// =============================================================================

/// A cancellable, time-bounded handle for cooperative timeout observance.
///
/// Clones share the same cancellation state and the same absolute deadline.
///
/// # Example
///
/// ```rust,ignore
/// async fn slow_lookup(ctx: DispatchContext) -> Result<String, DeadlineError> {
///     ctx.deadline().run(fetch_from_somewhere()).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DeadlineHandle {
    deadline: Instant,
    token: CancellationToken,
}

impl DeadlineHandle {
    /// Creates a handle that expires `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);

        Self {
            deadline,
            token: CancellationToken::new(),
        }
    }

    /// The absolute instant at which the handle expires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Cancels the handle. Every clone observes the cancellation immediately.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` if [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns `true` once the handle is cancelled or its deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.error().is_some()
    }

    /// Why the handle is no longer live, or `None` while it still is.
    ///
    /// Explicit cancellation takes precedence over expiry.
    pub fn error(&self) -> Option<DeadlineError> {
        if self.token.is_cancelled() {
            Some(DeadlineError::Cancelled)
        } else if Instant::now() >= self.deadline {
            Some(DeadlineError::Expired)
        } else {
            None
        }
    }

    /// Completes when the handle is cancelled or the deadline passes.
    pub async fn done(&self) -> DeadlineError {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => DeadlineError::Cancelled,
            _ = sleep_until(self.deadline) => DeadlineError::Expired,
        }
    }

    /// Runs `fut` until it completes or the handle is done, whichever is first.
    ///
    /// An already expired handle never polls `fut`.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            out = fut => Ok(out),
        }
    }

    /// A token cancelled together with this handle, for handing to spawned work.
    ///
    /// The token follows explicit cancellation only; pair it with
    /// [`deadline`](Self::deadline) if the spawned work must also stop on expiry.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

// =============================================================================
// DispatchContext
// =============================================================================

/// The mutable state of one in-flight dispatch.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    command: String,
    arguments: String,
    deadline: DeadlineHandle,
}

impl DispatchContext {
    /// Creates a fresh context whose deadline is `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            command: String::new(),
            arguments: String::new(),
            deadline: DeadlineHandle::new(timeout),
        }
    }

    /// The keyword matched at the deepest level reached so far.
    ///
    /// Empty until the originating router has tokenized the message.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The trimmed text not yet consumed by keyword matching.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// The deadline handle shared by everything in this dispatch.
    pub fn deadline(&self) -> &DeadlineHandle {
        &self.deadline
    }

    /// Returns `true` once the originating router has matched a keyword.
    pub(crate) fn has_command(&self) -> bool {
        !self.command.is_empty()
    }

    /// Consumes the first whitespace-delimited token of `text` as the new
    /// command and keeps the trimmed remainder as the new arguments.
    pub(crate) fn advance(&mut self, text: &str) {
        let text = text.trim();
        let (command, rest) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));

        self.command = command.to_string();
        self.arguments = rest.trim().to_string();
    }
}
