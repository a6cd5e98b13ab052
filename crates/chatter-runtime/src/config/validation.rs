//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, ChatterConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &ChatterConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.prefixes.is_empty() {
        return Err(ConfigError::missing_field("bot.prefixes"));
    }

    if bot.timeout_ms == 0 {
        return Err(ConfigError::validation("Timeout must be greater than 0"));
    }

    if let Some(token) = &bot.token
        && token.trim().is_empty()
    {
        return Err(ConfigError::validation("Token cannot be blank"));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    for (target, level) in &logging.filters {
        if target.is_empty() {
            return Err(ConfigError::validation("Log filter target cannot be empty"));
        }
        if LogLevel::parse(level).is_none() {
            return Err(ConfigError::InvalidLogLevel {
                target: target.clone(),
                level: level.clone(),
            });
        }
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "JSON log format requires the json-log feature",
        ));
    }

    Ok(())
}
