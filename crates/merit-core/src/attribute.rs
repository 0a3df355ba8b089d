//! Attribute accessors.
//!
//! An [`Attribute`] binds an object-level field name to a key of a handler's
//! backing [`Document`](crate::Document). Reading an unset key fails with
//! [`MeritError::NoAttribute`]; writing inserts or replaces the key.

use std::borrow::Cow;

use serde_json::Value;

use crate::document::Field;
use crate::error::MeritError;
use crate::handler::Handler;

pub const NAME: Attribute = Attribute::from_static("name");
pub const DESCRIPTION: Attribute = Attribute::from_static("description");
pub const NAMESPACE: Attribute = Attribute::from_static("namespace");
pub const PATH: Attribute = Attribute::from_static("path");
pub const ATTRIBUTES: Attribute = Attribute::from_static("attributes");

/// Get/set binding to one document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: Cow<'static, str>,
}

impl Attribute {
    /// Accessor for a runtime key name.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidAttribute`] if `key` is empty.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Result<Self, MeritError> {
        let key = key.into();
        if key.is_empty() {
            return Err(MeritError::InvalidAttribute("empty name".to_string()));
        }
        Ok(Self { key })
    }

    /// Accessor for a compile-time key name. Panics at compile time when
    /// used in a `const` with an empty key.
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        assert!(!key.is_empty(), "attribute key must not be empty");
        Self {
            key: Cow::Borrowed(key),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if the key is unset.
    pub fn get<'a>(&self, handler: &'a Handler) -> Result<&'a Field, MeritError> {
        handler
            .metadata()
            .get(&self.key)
            .ok_or_else(|| MeritError::NoAttribute(self.key.to_string()))
    }

    /// Read the key as plain JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset, or
    /// [`MeritError::InvalidMetadata`] if the key holds child handlers.
    pub fn get_value<'a>(&self, handler: &'a Handler) -> Result<&'a Value, MeritError> {
        self.get(handler)?.as_value().ok_or_else(|| {
            MeritError::InvalidMetadata(format!("{} holds handlers, not a value", self.key))
        })
    }

    /// Read the key as a string.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset, or
    /// [`MeritError::InvalidMetadata`] if the value is not a string.
    pub fn get_str<'a>(&self, handler: &'a Handler) -> Result<&'a str, MeritError> {
        self.get(handler)?
            .as_str()
            .ok_or_else(|| MeritError::InvalidMetadata(format!("{} is not a string", self.key)))
    }

    pub fn set(&self, handler: &mut Handler, value: impl Into<Field>) {
        handler.metadata_mut().insert(self.key.to_string(), value);
    }
}
