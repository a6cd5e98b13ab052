//! Configuration for the Chatter runtime.
//!
//! Settings are layered with figment: built-in defaults, TOML files found in
//! the search paths, then `CHATTER_*` environment variables.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, ChatterConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
