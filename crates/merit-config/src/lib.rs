//! # merit-config
//!
//! Layered configuration loading for Merit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MERIT_*` prefix, `__` as separator)
//! 2. Project-level `.merit/config.toml`
//! 3. User-level `~/.config/merit/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `MERIT_OUTPUT__MAX_WIDTH` -> `output.max_width`,
//! `MERIT_INPUT__FORMAT` -> `input.format`, etc.
//!
//! ```no_run
//! use merit_config::MeritConfig;
//!
//! let config = MeritConfig::load_with_dotenv().expect("config");
//! println!("table width: {}", config.output.max_width);
//! ```

mod error;
mod input;
mod output;

pub use error::ConfigError;
pub use input::InputConfig;
pub use output::{DisplayFormat, MIN_WIDTH, OutputConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG: &str = ".merit/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MeritConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl MeritConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and check the values.
    ///
    /// Does NOT call `dotenvy`; use [`MeritConfig::load_with_dotenv`] for `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the working directory, then [`MeritConfig::load`].
    ///
    /// # Errors
    ///
    /// See [`MeritConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on
    /// top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("MERIT_").split("__"))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.output.validate()
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("merit").join("config.toml"))
    }
}
