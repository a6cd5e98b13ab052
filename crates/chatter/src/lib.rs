//! # Chatter
//!
//! A command bot framework: messages that start with a configured prefix are
//! split into a keyword and its arguments and routed through a tree of
//! routers to a handler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  Incoming  ┌────────────────┐  task per message  ┌─────────────┐
//! │ Platform │───────────▶│ ChatterRuntime │───────────────────▶│ root Router │
//! └──────────┘            └────────────────┘                    └──────┬──────┘
//!                                                                      │ middleware
//!                                                      ┌───────────────┼──────────────┐
//!                                                      ▼               ▼              ▼
//!                                                   "echo"       "mod" Router     NotFound
//!                                                                      │ middleware
//!                                                                      ▼
//!                                                                   "kick"
//! ```
//!
//! - **Core**: platform boundary types (`MessageEvent`, `Session`, `Permissions`)
//! - **Framework**: `Router`, `DispatchContext`, `EventHandler` and middleware
//! - **Runtime**: configuration, logging setup and event delivery
//! - **Commands**: the builtin `echo` and `mod kick` commands
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatter::prelude::*;
//!
//! async fn ping(_: BoxedSession, _: Arc<MessageEvent>, _: DispatchContext) -> String {
//!     "pong".to_string()
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ChatterRuntime::builder().build(|router| {
//!         register_default_routes(router);
//!         router.add_command_fn("ping", ping);
//!     })?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     my_platform::connect(tx).await?;
//!     runtime.run(rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: read `chatter.toml` configuration files
//! - `json-log`: enable the JSON log format

pub use chatter_commands as commands;
pub use chatter_core as core;
pub use chatter_framework as framework;
pub use chatter_runtime as runtime;

/// Commonly used types for building and running a bot.
///
/// ```rust,ignore
/// use chatter::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Runtime - main entry point
    pub use chatter_runtime::{ChatterConfig, ChatterRuntime, Incoming};

    // Routing
    pub use chatter_framework::{
        CatchPanicLayer, DispatchContext, EventHandler, Layer, LoggingLayer, Middleware, Router,
        from_fn, handler_fn,
    };

    // Platform boundary
    pub use chatter_core::{
        ApiError, ApiResult, Author, BoxedSession, MessageEvent, Permissions, Session,
        member_has_permission,
    };

    // Builtin commands
    pub use chatter_commands::register_default_routes;
}
