//! # Chatter Framework
//!
//! The command routing and middleware composition engine of the Chatter bot.
//!
//! This layer provides:
//! - [`Router`] – a tree of prefix/keyword routers that resolves a message to a handler
//! - [`DispatchContext`] – the per-message state threaded through the tree, with a
//!   cancellable [`DeadlineHandle`]
//! - [`EventHandler`] – the capability shared by leaf functions, middleware
//!   wrappers and nested routers
//! - [`Middleware`] – handler transforms built on `tower_layer::Layer`, with the
//!   builtin [`LoggingLayer`] and [`CatchPanicLayer`]
//!
//! ```text
//! platform ──▶ Router::bootstrap ──▶ Router ──▶ middleware ──▶ Router ──▶ middleware ──▶ leaf
//!                    │                  ▲                        ▲
//!                    └─ DispatchContext ┴────── &mut ───────────┘
//! ```

pub mod context;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod router;

pub use context::{DeadlineHandle, DispatchContext};
pub use error::DeadlineError;
pub use handler::{BoxedHandler, EventHandler, HandlerFn, HandlerResponse, handler_fn};
pub use middleware::{
    BoxedMiddleware, CatchPanic, CatchPanicLayer, Logging, LoggingLayer, Middleware, from_fn,
};
pub use router::{DEFAULT_TIMEOUT, NotFound, Router};

pub use tower_layer::Layer;
