//! Presentation settings for the `merit` binary.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Narrowest table the renderer can still draw with nested handlers.
pub const MIN_WIDTH: usize = 40;

const fn default_max_width() -> usize {
    80
}

const fn default_indent() -> usize {
    4
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Json,
    Table,
    Raw,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: DisplayFormat,

    /// Table width in columns.
    #[serde(default = "default_max_width")]
    pub max_width: usize,

    /// JSON indent in spaces.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl OutputConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a table narrower than
    /// [`MIN_WIDTH`] or an indent over 16.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width < MIN_WIDTH {
            return Err(ConfigError::InvalidValue {
                field: "output.max_width".to_string(),
                reason: format!("must be at least {MIN_WIDTH}, got {}", self.max_width),
            });
        }
        if self.indent > 16 {
            return Err(ConfigError::InvalidValue {
                field: "output.indent".to_string(),
                reason: format!("must be at most 16, got {}", self.indent),
            });
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: DisplayFormat::default(),
            max_width: default_max_width(),
            indent: default_indent(),
        }
    }
}
