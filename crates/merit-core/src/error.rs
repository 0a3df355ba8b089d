//! Error types for schema registration, dispatch and document validation.
//!
//! Every failure in the core surfaces as a [`MeritError`]. The only place a
//! failure is swallowed is the best-effort registration performed when a
//! context or resource is attached to a root document, and only for
//! [`MeritError::DuplicateSchema`].

use thiserror::Error;

/// Errors raised by the registry, the dispatcher and handler instances.
#[derive(Debug, Error)]
pub enum MeritError {
    /// No registered handler claims the schema string.
    #[error("No handler for schema: {0}")]
    NoHandler(String),

    /// The document has no `schema` field.
    #[error("Document has no schema field")]
    MissingSchema,

    /// The schema string is already claimed by a registered handler.
    #[error("Schema already registered: {schema} (claimed by {handler})")]
    DuplicateSchema { schema: String, handler: String },

    /// The handler definition is not present in the registry.
    #[error("Handler not registered: {0}")]
    NotRegistered(String),

    /// A handler definition declares an empty or malformed schema identifier.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A document failed validation or could not be loaded.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// An attribute accessor was constructed without a field name.
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// The attribute is not set on the document.
    #[error("Missing attribute: {0}")]
    NoAttribute(String),

    /// A null or non-context handler was attached as a context.
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// A null or non-resource handler was attached as a resource.
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeritError {
    /// Validation failure for a required key absent from the document.
    pub(crate) fn missing(key: &str) -> Self {
        Self::InvalidMetadata(format!("Missing: {key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::MeritError;

    #[test]
    fn missing_key_message_names_the_key() {
        let error = MeritError::missing("namespace");
        assert_eq!(error.to_string(), "Invalid metadata: Missing: namespace");
    }

    #[test]
    fn duplicate_schema_message_names_both_sides() {
        let error = MeritError::DuplicateSchema {
            schema: "hello".to_string(),
            handler: "HelloMerit".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("hello"));
        assert!(text.contains("HelloMerit"));
    }
}
