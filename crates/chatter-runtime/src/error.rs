//! Runtime error types.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::config::ConfigError;

/// Errors that can occur while starting or running the bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The logging system could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// A shutdown signal handler could not be registered.
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

/// Errors that can occur while installing the logging system.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Init(#[from] TryInitError),

    /// The log file appender could not be created.
    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
