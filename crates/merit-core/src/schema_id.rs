//! Schema identifiers.
//!
//! A schema identifier names the shape of a document. Standard identifiers
//! follow `<domain>:<kind>:v<N>` (for example `context:platform:v1`), but the
//! registry treats them as opaque strings. A handler may claim several
//! literals at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MeritError;

/// A single schema string or an ordered list of schema strings.
///
/// Never empty and never containing an empty string once checked with
/// [`SchemaId::check`]; every constructor in this module performs that check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaId {
    Single(String),
    Many(Vec<String>),
}

impl SchemaId {
    /// Build a single-literal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidSchema`] if `schema` is empty.
    pub fn new(schema: impl Into<String>) -> Result<Self, MeritError> {
        let id = Self::Single(schema.into());
        id.check()?;
        Ok(id)
    }

    /// Build a multi-literal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidSchema`] if the list is empty or any
    /// literal is empty.
    pub fn many<I, S>(schemas: I) -> Result<Self, MeritError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = Self::Many(schemas.into_iter().map(Into::into).collect());
        id.check()?;
        Ok(id)
    }

    /// Parse the value of a `schema` field: a string or a list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidSchema`] for any other JSON type, an
    /// empty list, or empty literals.
    pub fn from_value(value: &Value) -> Result<Self, MeritError> {
        match value {
            Value::String(schema) => Self::new(schema.clone()),
            Value::Array(items) => {
                let literals = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_owned).ok_or_else(|| {
                            MeritError::InvalidSchema("Schema type or value error".to_string())
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::many(literals)
            }
            _ => Err(MeritError::InvalidSchema("Invalid schema type".to_string())),
        }
    }

    /// Enforce the identifier invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidSchema`] when the identifier is empty or
    /// holds an empty literal.
    pub fn check(&self) -> Result<(), MeritError> {
        match self {
            Self::Single(schema) if schema.is_empty() => {
                Err(MeritError::InvalidSchema("Schema empty".to_string()))
            }
            Self::Many(schemas) if schemas.is_empty() => {
                Err(MeritError::InvalidSchema("Schema empty".to_string()))
            }
            Self::Many(schemas) if schemas.iter().any(String::is_empty) => Err(
                MeritError::InvalidSchema("Schema type or value error".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Every literal this identifier claims, in declaration order.
    #[must_use]
    pub fn literals(&self) -> &[String] {
        match self {
            Self::Single(schema) => std::slice::from_ref(schema),
            Self::Many(schemas) => schemas,
        }
    }

    /// Whether `schema` is one of the literals.
    #[must_use]
    pub fn contains(&self, schema: &str) -> bool {
        self.literals().iter().any(|literal| literal == schema)
    }

    /// First declared literal.
    #[must_use]
    pub fn primary(&self) -> &str {
        self.literals().first().map_or("", String::as_str)
    }

    /// Wire form: a JSON string or a JSON array of strings.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(schema) => Value::String(schema.clone()),
            Self::Many(schemas) => {
                Value::Array(schemas.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literals().join(", "))
    }
}

impl From<&str> for SchemaId {
    fn from(schema: &str) -> Self {
        Self::Single(schema.to_string())
    }
}

impl From<String> for SchemaId {
    fn from(schema: String) -> Self {
        Self::Single(schema)
    }
}

impl From<Vec<String>> for SchemaId {
    fn from(schemas: Vec<String>) -> Self {
        Self::Many(schemas)
    }
}

impl<const N: usize> From<[&str; N]> for SchemaId {
    fn from(schemas: [&str; N]) -> Self {
        Self::Many(schemas.iter().map(|schema| (*schema).to_string()).collect())
    }
}
