//! The event handler capability.
//!
//! Everything the router can invoke is an [`EventHandler`]:
//!
//! - **Leaf functions** ([`func`]) – plain async functions adapted through
//!   [`handler_fn`], with their return value processed by [`HandlerResponse`]
//! - **Middleware wrappers** – handlers produced by a
//!   [`Middleware`](crate::Middleware) around an inner handler
//! - **Routers** – a nested [`Router`](crate::Router) resolves its own keyword
//!   and recurses with the same [`DispatchContext`]
//!
//! ```text
//! Router ──▶ [middleware N ▶ … ▶ middleware 1 ▶] HandlerFn | Router | NotFound
//! ```

pub mod func;
pub mod response;

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::DispatchContext;
use chatter_core::{BoxedSession, MessageEvent};

pub use func::{HandlerFn, handler_fn};
pub use response::HandlerResponse;

/// Anything able to consume a message event within a dispatch.
///
/// Handlers receive the dispatch context by mutable reference; a nested router
/// advances it in place so that deeper levels see the already consumed
/// keyword and the shrunken argument text.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Handles one event.
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    );
}

/// A type-erased handler that can be stored in routing tables and wrapped by
/// middleware.
pub type BoxedHandler = Arc<dyn EventHandler>;

#[async_trait]
impl<H> EventHandler for Arc<H>
where
    H: EventHandler + ?Sized,
{
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        (**self).handle(session, event, ctx).await;
    }
}
