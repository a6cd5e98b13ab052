//! Chatter Runtime - configuration, logging and event delivery for the Chatter bot.
//!
//! This crate provides:
//! - Layered configuration (`ConfigLoader`, `ChatterConfig`)
//! - Logging setup on `tracing-subscriber` (`LoggingBuilder`)
//! - Event delivery (`ChatterRuntime`), one task per incoming message
//!
//! ```ignore
//! use chatter_runtime::{ChatterRuntime, Incoming};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ChatterRuntime::builder().build(|router| {
//!         router.add_command_fn("ping", ping);
//!     })?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     spawn_platform(tx);
//!     runtime.run(rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{BotConfig, ChatterConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use error::{LoggingError, RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ChatterRuntime, Incoming, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
