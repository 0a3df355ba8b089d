//! Schema registry and tagged dispatch.
//!
//! The [`Registry`] maps literal schema strings to [`HandlerDef`]s. It is an
//! ordinary value owned by whoever performs dispatch; nothing registers
//! itself implicitly. Lookup is a linear scan in registration order.
//!
//! Dispatch reads the `schema` discriminant of an untyped document, resolves
//! the definition, instantiates it and loads the document into it. Nested
//! contexts and resources are dispatched the same way by the root's load
//! hooks, so a failure at any depth leaves nothing constructed.

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::codec::Format;
use crate::definition::{Capability, HandlerDef};
use crate::document::SCHEMA_KEY;
use crate::error::MeritError;
use crate::handler::Handler;
use crate::schema_id::SchemaId;

/// One row of [`Registry::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub schema: String,
    pub type_name: String,
    pub module: String,
    pub capability: Capability,
}

#[derive(Debug, Default)]
pub struct Registry {
    handlers: Vec<Arc<HandlerDef>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::DuplicateSchema`] if any literal of the
    /// definition's schema is already claimed, or
    /// [`MeritError::InvalidSchema`] for a malformed identifier.
    pub fn register(&mut self, def: Arc<HandlerDef>) -> Result<(), MeritError> {
        def.schema().check()?;
        for literal in def.schema().literals() {
            if let Ok(existing) = self.resolve(literal) {
                return Err(MeritError::DuplicateSchema {
                    schema: literal.clone(),
                    handler: existing.type_name().to_string(),
                });
            }
        }
        tracing::debug!(schema = %def.schema(), handler = def.type_name(), "registered handler");
        self.handlers.push(def);
        Ok(())
    }

    /// Remove a definition by identity.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::NotRegistered`] if this exact definition is not
    /// in the table; an equal-looking definition does not count.
    pub fn unregister(&mut self, def: &Arc<HandlerDef>) -> Result<(), MeritError> {
        let index = self
            .handlers
            .iter()
            .position(|registered| Arc::ptr_eq(registered, def))
            .ok_or_else(|| MeritError::NotRegistered(def.type_name().to_string()))?;
        let removed = self.handlers.remove(index);
        tracing::debug!(schema = %removed.schema(), handler = removed.type_name(), "unregistered handler");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoHandler`] if no definition claims `schema`.
    pub fn resolve(&self, schema: &str) -> Result<&Arc<HandlerDef>, MeritError> {
        self.handlers
            .iter()
            .find(|def| def.schema().contains(schema))
            .ok_or_else(|| MeritError::NoHandler(schema.to_string()))
    }

    /// Resolve the first literal of `schema` that any definition claims.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::NoHandler`] if none does.
    pub fn get(&self, schema: &SchemaId) -> Result<&Arc<HandlerDef>, MeritError> {
        schema
            .literals()
            .iter()
            .find_map(|literal| self.resolve(literal).ok())
            .ok_or_else(|| MeritError::NoHandler(schema.to_string()))
    }

    #[must_use]
    pub fn contains(&self, def: &Arc<HandlerDef>) -> bool {
        self.handlers
            .iter()
            .any(|registered| Arc::ptr_eq(registered, def))
    }

    /// One row per claimed literal, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<RegistryEntry> {
        self.handlers
            .iter()
            .flat_map(|def| {
                def.schema().literals().iter().map(|schema| RegistryEntry {
                    schema: schema.clone(),
                    type_name: def.type_name().to_string(),
                    module: def.module().to_string(),
                    capability: def.capability(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn handlers(&self) -> &[Arc<HandlerDef>] {
        &self.handlers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Fresh instance of the definition claiming `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::NoHandler`] or an `initialize` failure.
    pub fn instantiate(&self, schema: &str) -> Result<Handler, MeritError> {
        self.resolve(schema)?.instantiate()
    }

    // -- dispatch -----------------------------------------------------------

    /// Definition named by the document's `schema` field.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidMetadata`] if the document is not a
    /// mapping, [`MeritError::MissingSchema`] if it has no `schema`,
    /// [`MeritError::InvalidSchema`] if `schema` is neither a string nor a
    /// list of strings, and [`MeritError::NoHandler`] if nothing claims it.
    pub fn find_handler_for_document(
        &self,
        document: &Value,
    ) -> Result<&Arc<HandlerDef>, MeritError> {
        let Value::Object(map) = document else {
            return Err(MeritError::InvalidMetadata(
                "Metadata not a mapping".to_string(),
            ));
        };
        let schema = map.get(SCHEMA_KEY).ok_or(MeritError::MissingSchema)?;
        self.get(&SchemaId::from_value(schema)?)
    }

    /// Build a typed handler graph from an untyped document.
    ///
    /// # Errors
    ///
    /// Any lookup failure of [`Registry::find_handler_for_document`], or a
    /// load failure at any nesting depth.
    pub fn dispatch(&self, document: Value) -> Result<Handler, MeritError> {
        let def = Arc::clone(self.find_handler_for_document(&document)?);
        tracing::debug!(schema = %def.schema(), handler = def.type_name(), "dispatching document");
        let mut handler = def.instantiate()?;
        handler.load(self, document)?;
        Ok(handler)
    }

    /// [`dispatch`](Registry::dispatch) restricted to one capability; used
    /// for the elements of a root's `contexts` and `resources`.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidMetadata`] when the resolved definition
    /// has a different capability, plus any [`Registry::dispatch`] failure.
    pub fn dispatch_as(&self, document: Value, kind: Capability) -> Result<Handler, MeritError> {
        let def = self.find_handler_for_document(&document)?;
        if def.capability() != kind {
            return Err(MeritError::InvalidMetadata(format!(
                "Non-{kind} specified in {kind} field"
            )));
        }
        self.dispatch(document)
    }

    /// # Errors
    ///
    /// A decode failure or any [`Registry::dispatch`] failure.
    pub fn dispatch_str(&self, text: &str, format: Format) -> Result<Handler, MeritError> {
        self.dispatch(format.parse(text)?)
    }

    /// # Errors
    ///
    /// A read or decode failure, or any [`Registry::dispatch`] failure.
    pub fn dispatch_reader(&self, reader: impl Read, format: Format) -> Result<Handler, MeritError> {
        self.dispatch(format.read(reader)?)
    }

    /// Check a wire document against the JSON Schema of the definition its
    /// `schema` field names. Structural only: per-key hooks do not run.
    ///
    /// # Errors
    ///
    /// Any lookup failure of [`Registry::find_handler_for_document`], or
    /// [`MeritError::InvalidMetadata`] listing every schema violation.
    pub fn check_wire(&self, document: &Value) -> Result<(), MeritError> {
        let def = self.find_handler_for_document(document)?;
        let validator = jsonschema::validator_for(&def.json_schema())
            .map_err(|e| MeritError::InvalidSchema(format!("{}: {e}", def.type_name())))?;

        let errors: Vec<String> = validator
            .iter_errors(document)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MeritError::InvalidMetadata(errors.join("; ")))
        }
    }
}
