//! Processing of leaf handler return values.

use async_trait::async_trait;
use tracing::error;

use chatter_core::{MessageEvent, Session};

/// A trait for types that can be returned from leaf handler functions.
#[async_trait]
pub trait HandlerResponse: Send + 'static {
    /// Process the handler response, performing any necessary side effects
    /// (e.g. replying to the originating channel).
    async fn process_response(self, session: &dyn Session, event: &MessageEvent);
}

/// Implementation for `()` - no response needed.
#[async_trait]
impl HandlerResponse for () {
    async fn process_response(self, _session: &dyn Session, _event: &MessageEvent) {
        // No action needed
    }
}

/// Implementation for `String` - reply to the originating channel, log send failures.
#[async_trait]
impl HandlerResponse for String {
    async fn process_response(self, session: &dyn Session, event: &MessageEvent) {
        if let Err(e) = session.send_message(&event.channel_id, &self).await {
            error!(channel_id = %event.channel_id, error = %e, "could not send message");
        }
    }
}

/// Implementation for `Option<T>` where T implements HandlerResponse.
///
/// On Some, the inner value's response is handled. On None, no action is taken.
#[async_trait]
impl<T: HandlerResponse> HandlerResponse for Option<T> {
    async fn process_response(self, session: &dyn Session, event: &MessageEvent) {
        if let Some(t) = self {
            t.process_response(session, event).await;
        }
    }
}

/// Implementation for `Result<T, E>` where T implements HandlerResponse.
///
/// On Ok, the inner value's response is handled. On Err, the error is logged.
#[async_trait]
impl<T, E> HandlerResponse for Result<T, E>
where
    T: HandlerResponse,
    E: std::fmt::Display + Send + 'static,
{
    async fn process_response(self, session: &dyn Session, event: &MessageEvent) {
        match self {
            Ok(t) => t.process_response(session, event).await,
            Err(e) => {
                error!(channel_id = %event.channel_id, "handler error: {e}");
            }
        }
    }
}
