//! Panic containment middleware.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tower_layer::Layer;
use tracing::error;

use crate::context::DispatchContext;
use crate::handler::EventHandler;
use chatter_core::{BoxedSession, MessageEvent};

/// Contains panics raised by the inner handler.
///
/// A panic ends the dispatch of that message: it is logged once, with the
/// matched keyword, the remaining arguments and the panic payload, and the
/// call returns normally. Layers outside this one run their "after" logic as
/// usual; the router tree and other dispatches are unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchPanicLayer;

impl<S> Layer<S> for CatchPanicLayer {
    type Service = CatchPanic<S>;

    fn layer(&self, inner: S) -> CatchPanic<S> {
        CatchPanic { inner }
    }
}

/// The handler produced by [`CatchPanicLayer`].
#[derive(Debug, Clone)]
pub struct CatchPanic<S> {
    inner: S,
}

#[async_trait]
impl<S: EventHandler> EventHandler for CatchPanic<S> {
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        let outcome = AssertUnwindSafe(self.inner.handle(session, event, ctx))
            .catch_unwind()
            .await;

        if let Err(payload) = outcome {
            error!(
                command = %ctx.command(),
                arguments = %ctx.arguments(),
                panic = %panic_message(payload.as_ref()),
                "recovered from panic"
            );
        }
    }
}

/// Extracts the message of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}
