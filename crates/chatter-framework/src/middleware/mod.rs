//! Middleware: transforms from one [`EventHandler`] to another.
//!
//! A middleware is expressed as a [`tower_layer::Layer`] over [`BoxedHandler`]
//! whose service is itself an [`EventHandler`]. Every such layer is a
//! [`Middleware`] through a blanket implementation, so the builtins
//! ([`LoggingLayer`], [`CatchPanicLayer`]) and user layers are registered the
//! same way. Ad-hoc transforms can be written as closures with [`from_fn`].
//!
//! # Composition order
//!
//! A router folds its middleware list over the resolved handler in
//! registration order, each step producing a new outer wrapper. The
//! last-registered middleware therefore ends up outermost:
//!
//! ```text
//! router.use_middleware(A);
//! router.use_middleware(B);
//!
//! B before ─▶ A before ─▶ handler ─▶ A after ─▶ B after
//! ```

pub mod catch_panic;
pub mod logging;

use std::sync::Arc;

use tower_layer::Layer;

use crate::handler::{BoxedHandler, EventHandler};

pub use catch_panic::{CatchPanic, CatchPanicLayer, panic_message};
pub use logging::{Logging, LoggingLayer};

/// A transform from one handler to a new handler wrapping it.
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `inner`, returning the new outer handler.
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler;
}

impl<L> Middleware for L
where
    L: Layer<BoxedHandler> + Send + Sync + 'static,
    L::Service: EventHandler,
{
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        Arc::new(self.layer(inner))
    }
}

/// A type-erased middleware as stored by a router.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Applies `middleware` around `handler` in order; the last entry is outermost.
pub fn compose(handler: BoxedHandler, middleware: &[BoxedMiddleware]) -> BoxedHandler {
    middleware
        .iter()
        .fold(handler, |inner, layer| layer.wrap(inner))
}

/// A [`Layer`] built from a plain `BoxedHandler -> BoxedHandler` closure.
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

/// Creates a middleware from a closure.
///
/// ```rust,ignore
/// router.use_middleware(from_fn(|inner| Arc::new(Audit { inner }) as BoxedHandler));
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    FromFn { f }
}

impl<F> Layer<BoxedHandler> for FromFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler,
{
    type Service = BoxedHandler;

    fn layer(&self, inner: BoxedHandler) -> BoxedHandler {
        (self.f)(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DispatchContext;
    use async_trait::async_trait;
    use chatter_core::{ApiError, ApiResult, Author, BoxedSession, MessageEvent, Role, Session};
    use parking_lot::Mutex;
    use std::time::Duration;

    type Trace = Arc<Mutex<Vec<String>>>;

    struct NullSession;

    #[async_trait]
    impl Session for NullSession {
        fn user_id(&self) -> &str {
            "bot"
        }

        async fn send_message(&self, _channel_id: &str, _content: &str) -> ApiResult<()> {
            Ok(())
        }

        async fn role(&self, _guild_id: &str, role_id: &str) -> ApiResult<Role> {
            Err(ApiError::not_found("role", role_id))
        }

        async fn remove_member(&self, _guild_id: &str, _user_id: &str) -> ApiResult<()> {
            Ok(())
        }
    }

    struct Leaf(Trace);

    #[async_trait]
    impl EventHandler for Leaf {
        async fn handle(&self, _: &BoxedSession, _: &Arc<MessageEvent>, _: &mut DispatchContext) {
            self.0.lock().push("handler".into());
        }
    }

    struct Recorded {
        name: &'static str,
        trace: Trace,
        inner: BoxedHandler,
    }

    #[async_trait]
    impl EventHandler for Recorded {
        async fn handle(
            &self,
            session: &BoxedSession,
            event: &Arc<MessageEvent>,
            ctx: &mut DispatchContext,
        ) {
            self.trace.lock().push(format!("{} before", self.name));
            self.inner.handle(session, event, ctx).await;
            self.trace.lock().push(format!("{} after", self.name));
        }
    }

    fn recording(name: &'static str, trace: &Trace) -> BoxedMiddleware {
        let trace = Arc::clone(trace);
        Arc::new(from_fn(move |inner| {
            Arc::new(Recorded {
                name,
                trace: Arc::clone(&trace),
                inner,
            }) as BoxedHandler
        }))
    }

    struct Suppress;

    impl Layer<BoxedHandler> for Suppress {
        type Service = Skipped;

        fn layer(&self, _inner: BoxedHandler) -> Skipped {
            Skipped
        }
    }

    struct Skipped;

    #[async_trait]
    impl EventHandler for Skipped {
        async fn handle(&self, _: &BoxedSession, _: &Arc<MessageEvent>, _: &mut DispatchContext) {}
    }

    async fn invoke(handler: BoxedHandler) {
        let session: BoxedSession = Arc::new(NullSession);
        let event = Arc::new(MessageEvent::new("c1", Author::new("u1", "alice"), "$x"));
        let mut ctx = DispatchContext::new(Duration::from_secs(1));
        handler.handle(&session, &event, &mut ctx).await;
    }

    #[tokio::test]
    async fn last_registered_is_outermost() {
        let trace: Trace = Arc::default();
        let stack = vec![recording("A", &trace), recording("B", &trace)];

        invoke(compose(Arc::new(Leaf(Arc::clone(&trace))), &stack)).await;

        assert_eq!(
            *trace.lock(),
            vec!["B before", "A before", "handler", "A after", "B after"]
        );
    }

    #[tokio::test]
    async fn empty_stack_is_identity() {
        let trace: Trace = Arc::default();

        invoke(compose(Arc::new(Leaf(Arc::clone(&trace))), &[])).await;

        assert_eq!(*trace.lock(), vec!["handler"]);
    }

    #[tokio::test]
    async fn middleware_may_suppress_inner_handler() {
        let trace: Trace = Arc::default();
        let stack: Vec<BoxedMiddleware> = vec![Arc::new(Suppress), recording("outer", &trace)];

        invoke(compose(Arc::new(Leaf(Arc::clone(&trace))), &stack)).await;

        assert_eq!(*trace.lock(), vec!["outer before", "outer after"]);
    }
}
