//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config`: enables TOML configuration files (`chatter.toml`, `config.toml`).
//!   Without it only defaults and environment variables are read.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic values passed to [`ConfigLoader::merge`]
//! 3. Main config file (`chatter.toml`, falling back to `config.toml`)
//! 4. Profile-specific variant of that file (`chatter.{profile}.toml`)
//! 5. Environment variables (`CHATTER_*`)
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `CHATTER_` prefix with `__` as the nesting
//! separator:
//!
//! - `CHATTER_BOT__TOKEN=xxx` → `bot.token = "xxx"`
//! - `CHATTER_BOT__PREFIXES=!` → `bot.prefixes = ["!"]`
//! - `CHATTER_BOT__PREFIXES=["!", "?"]` → `bot.prefixes = ["!", "?"]`
//! - `CHATTER_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use chatter_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/chatter.toml")
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ChatterConfig;

const ENV_PREFIX: &str = "CHATTER_";
const PROFILE_VAR: &str = "CHATTER_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads the profile from `CHATTER_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::from_name(&p))
            .unwrap_or_default()
    }

    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layered configuration loader.
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader that searches the default locations and reads the environment.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::from_name(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    ///
    /// Once any search path is added, the default locations (current
    /// directory and the user config directory) are no longer searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration values programmatically, below files and environment.
    pub fn merge(mut self, config: ChatterConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<ChatterConfig> {
        let profile = self.profile.clone();
        let config: ChatterConfig = self.build_figment()?.extract()?;

        debug!(
            profile = %profile,
            prefixes = ?config.bot.prefixes,
            timeout_ms = config.bot.timeout_ms,
            logging_level = %config.logging.level,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ChatterConfig::default()));
        figment = figment.merge(std::mem::take(&mut self.figment));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_config_file(figment, path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }

        Ok(figment)
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("chatter"));
        }
        paths
    }

    /// Merges the first config file found, then its profile variant over it.
    #[cfg(feature = "toml-config")]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        for search_path in self.resolve_search_paths() {
            for stem in ["chatter", "config"] {
                let base_path = search_path.join(format!("{stem}.toml"));
                let profile_path =
                    search_path.join(format!("{stem}.{}.toml", self.profile.as_str()));

                let mut found = false;
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = figment.merge(Toml::file(&base_path));
                    found = true;
                }
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = figment.merge(Toml::file(&profile_path));
                    found = true;
                }
                if found {
                    return figment;
                }
            }
        }

        warn!("No configuration file found, using defaults");
        figment
    }

    #[cfg(not(feature = "toml-config"))]
    fn load_config_files(&self, figment: Figment) -> Figment {
        trace!(
            paths = ?self.resolve_search_paths(),
            "File configuration disabled, skipping search"
        );
        figment
    }
}

#[cfg_attr(not(feature = "toml-config"), allow(unused_variables))]
fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::ParseError(format!(
            "Unsupported or disabled configuration file format: .{ext}"
        ))),
    }
}

/// Loads configuration from the default locations and the environment.
pub fn load_config() -> ConfigResult<ChatterConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file, then the environment.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<ChatterConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================
