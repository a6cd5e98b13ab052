//! Leaf handlers built from plain async functions.
//!
//! ```rust,ignore
//! async fn echo(_: BoxedSession, _: Arc<MessageEvent>, ctx: DispatchContext) -> String {
//!     ctx.arguments().to_string()
//! }
//!
//! router.add_command_fn("echo", echo);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::EventHandler;
use super::response::HandlerResponse;
use crate::context::DispatchContext;
use chatter_core::{BoxedSession, MessageEvent};

/// An [`EventHandler`] that calls a plain async function.
///
/// The function receives owned handles: the session, the event and a snapshot
/// of the dispatch context. The snapshot shares the dispatch's
/// [`DeadlineHandle`](crate::DeadlineHandle), so cancellation and expiry are
/// observed exactly as through the original.
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Wraps a function.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

/// Wraps a plain async function into the [`EventHandler`] capability.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(BoxedSession, Arc<MessageEvent>, DispatchContext) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: HandlerResponse,
{
    HandlerFn::new(f)
}

#[async_trait]
impl<F, Fut> EventHandler for HandlerFn<F>
where
    F: Fn(BoxedSession, Arc<MessageEvent>, DispatchContext) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: HandlerResponse,
{
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        let response = (self.f)(Arc::clone(session), Arc::clone(event), ctx.clone()).await;
        response.process_response(session.as_ref(), event).await;
    }
}
