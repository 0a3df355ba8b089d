//! Text forms of the wire document.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::MeritError;

/// Indent used by [`Handler::dumps`](crate::Handler::dumps).
pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Guess from a file extension; anything but `.yaml`/`.yml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// # Errors
    ///
    /// Returns the decoder's error for malformed text.
    pub fn parse(self, text: &str) -> Result<Value, MeritError> {
        match self {
            Self::Json => Ok(serde_json::from_str(text)?),
            Self::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }

    /// # Errors
    ///
    /// Returns the decoder's error for malformed input or a read failure.
    pub fn read(self, reader: impl Read) -> Result<Value, MeritError> {
        match self {
            Self::Json => Ok(serde_json::from_reader(reader)?),
            Self::Yaml => Ok(serde_yaml::from_reader(reader)?),
        }
    }

    /// Render `value`. `indent` applies to JSON only.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error.
    pub fn render(self, value: &Value, indent: usize) -> Result<String, MeritError> {
        match self {
            Self::Json => {
                let pad = " ".repeat(indent);
                let mut buf = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(
                    &mut buf,
                    PrettyFormatter::with_indent(pad.as_bytes()),
                );
                value.serialize(&mut serializer)?;
                Ok(String::from_utf8_lossy(&buf).into_owned())
            }
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = MeritError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(MeritError::InvalidMetadata(format!(
                "unknown document format: {other}"
            ))),
        }
    }
}
