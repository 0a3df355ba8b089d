//! In-memory document model.
//!
//! On the wire a document is a JSON object. In memory a [`Handler`] keeps a
//! [`Document`]: an insertion-ordered map whose values are either plain JSON
//! or, for keys loaded through a load hook (`contexts`, `resources`), typed
//! child handlers.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::MeritError;
use crate::handler::Handler;

/// Key holding the schema discriminant at every dispatched level.
pub const SCHEMA_KEY: &str = "schema";

/// A single document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Untyped JSON, kept as-is.
    Value(Value),
    /// Typed child handlers owned by the parent document.
    Handlers(Vec<Handler>),
}

impl Field {
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Handlers(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_handlers(&self) -> Option<&[Handler]> {
        match self {
            Self::Handlers(handlers) => Some(handlers),
            Self::Value(_) => None,
        }
    }

    /// Plain JSON form, used when the key has no dump hook.
    ///
    /// # Errors
    ///
    /// Propagates the dump failure of any child handler.
    pub fn to_value(&self) -> Result<Value, MeritError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Handlers(handlers) => handlers
                .iter()
                .map(|handler| handler.dump().map(Value::Object))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<Vec<Handler>> for Field {
    fn from(handlers: Vec<Handler>) -> Self {
        Self::Handlers(handlers)
    }
}

/// Insertion-ordered mapping of keys to [`Field`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Field>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.get_mut(key)
    }

    /// Insert or replace a value. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Field>) -> Option<Field> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Field> {
        self.fields.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub(crate) fn entry(&mut self, key: &str) -> &mut Field {
        self.fields
            .entry(key.to_string())
            .or_insert_with(|| Field::Handlers(Vec::new()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Field>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn insertion_order_is_kept_across_replace_and_remove() {
        let mut doc = Document::new();
        doc.insert("b", "1");
        doc.insert("a", "2");
        doc.insert("c", "3");
        doc.insert("b", "4");
        doc.remove("a");

        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(doc.get("b").and_then(Field::as_str), Some("4"));
    }

    #[test]
    fn value_fields_dump_as_themselves() {
        let field = Field::from(json!({"k": [1, 2]}));
        assert_eq!(field.to_value().unwrap(), json!({"k": [1, 2]}));
        assert!(field.as_handlers().is_none());
    }

    #[test]
    fn empty_handler_list_dumps_as_empty_array() {
        let field = Field::Handlers(Vec::new());
        assert_eq!(field.to_value().unwrap(), json!([]));
        assert!(field.as_value().is_none());
    }

    #[test]
    fn collects_from_pairs() {
        let doc: Document = [("name", "n"), ("description", "d")].into_iter().collect();
        assert_eq!(doc.len(), 2);
        assert!(doc.contains_key("description"));
    }
}
