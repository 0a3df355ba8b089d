//! Handler definitions.
//!
//! A [`HandlerDef`] is the "type" side of a handler: its schema identifier,
//! capability tag, required keys, serialization order hint, per-key hooks and
//! the `initialize` hook that seeds every new instance. Definitions are
//! immutable once built and are shared through `Arc`; the registry compares
//! them by pointer identity.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::document::{Field, SCHEMA_KEY};
use crate::error::MeritError;
use crate::handler::Handler;
use crate::hooks::{HookTable, InitializeHook};
use crate::registry::Registry;
use crate::schema_id::SchemaId;

pub const CONTEXTS_KEY: &str = "contexts";
pub const RESOURCES_KEY: &str = "resources";

/// Required keys of every non-root handler.
pub const BASE_REQUIRED: [&str; 2] = ["name", "description"];

/// Required keys of a root document, in declaration order.
pub const ROOT_REQUIRED: [&str; 6] = [
    "namespace",
    "path",
    "name",
    "description",
    CONTEXTS_KEY,
    RESOURCES_KEY,
];

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// What a handler variant can be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Context,
    Resource,
    Root,
    Other,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Resource => "resource",
            Self::Root => "root",
            Self::Other => "other",
        }
    }

    /// Root-document key holding children of this capability.
    #[must_use]
    pub const fn collection_key(self) -> Option<&'static str> {
        match self {
            Self::Context => Some(CONTEXTS_KEY),
            Self::Resource => Some(RESOURCES_KEY),
            Self::Root | Self::Other => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HandlerDef
// ---------------------------------------------------------------------------

pub struct HandlerDef {
    type_name: String,
    module: String,
    schema: SchemaId,
    capability: Capability,
    required: Vec<String>,
    order: Vec<String>,
    emit_order: Vec<String>,
    hooks: HookTable,
    initialize: InitializeHook,
}

impl HandlerDef {
    /// Start a definition. `initialize` is mandatory: it seeds the document
    /// of every instance and may be a no-op.
    ///
    /// Required keys default to [`ROOT_REQUIRED`] for [`Capability::Root`]
    /// and [`BASE_REQUIRED`] otherwise. The module defaults to the caller's
    /// source file.
    #[track_caller]
    pub fn builder<F>(
        type_name: impl Into<String>,
        capability: Capability,
        initialize: F,
    ) -> HandlerDefBuilder
    where
        F: Fn(&mut Handler) -> Result<(), MeritError> + Send + Sync + 'static,
    {
        let required: &[&str] = if capability == Capability::Root {
            &ROOT_REQUIRED
        } else {
            &BASE_REQUIRED
        };
        HandlerDefBuilder {
            type_name: type_name.into(),
            module: Location::caller().file().to_string(),
            schema: None,
            capability,
            required: required.iter().map(|key| (*key).to_string()).collect(),
            order: Vec::new(),
            hooks: HookTable::new(),
            initialize: Arc::new(initialize),
        }
    }

    /// Start a new definition that inherits everything from this one.
    #[track_caller]
    #[must_use]
    pub fn extend(&self, type_name: impl Into<String>) -> HandlerDefBuilder {
        HandlerDefBuilder {
            type_name: type_name.into(),
            module: Location::caller().file().to_string(),
            schema: Some(self.schema.clone()),
            capability: self.capability,
            required: self.required.clone(),
            order: self.order.clone(),
            hooks: self.hooks.clone(),
            initialize: Arc::clone(&self.initialize),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaId {
        &self.schema
    }

    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    #[must_use]
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|required| required == key)
    }

    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Keys emitted right after `schema` by `dump`: the explicit order hint,
    /// then the remaining required keys in declaration order.
    #[must_use]
    pub fn emit_order(&self) -> &[String] {
        &self.emit_order
    }

    #[must_use]
    pub const fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub(crate) fn initialize(&self, handler: &mut Handler) -> Result<(), MeritError> {
        (self.initialize)(handler)
    }

    /// Create a fresh instance; runs the `initialize` hook.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the `initialize` hook.
    pub fn instantiate(self: &Arc<Self>) -> Result<Handler, MeritError> {
        Handler::new(Arc::clone(self))
    }

    /// JSON Schema (draft 2020-12) of the wire document this definition
    /// accepts and emits.
    #[must_use]
    pub fn json_schema(&self) -> Value {
        let schema_property = match &self.schema {
            SchemaId::Single(schema) => json!({ "const": schema }),
            SchemaId::Many(schemas) => json!({
                "anyOf": [
                    { "enum": schemas },
                    { "const": schemas },
                ]
            }),
        };

        let mut properties = serde_json::Map::new();
        properties.insert(SCHEMA_KEY.to_string(), schema_property);
        for key in [CONTEXTS_KEY, RESOURCES_KEY] {
            if self.capability == Capability::Root && self.is_required(key) {
                properties.insert(
                    key.to_string(),
                    json!({
                        "type": "array",
                        "items": { "type": "object", "required": [SCHEMA_KEY] },
                    }),
                );
            }
        }

        let mut required = vec![SCHEMA_KEY.to_string()];
        required.extend(self.required.iter().cloned());

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": self.type_name,
            "type": "object",
            "required": required,
            "properties": properties,
        })
    }
}

impl fmt::Debug for HandlerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDef")
            .field("type_name", &self.type_name)
            .field("schema", &self.schema)
            .field("capability", &self.capability)
            .field("required", &self.required)
            .field("order", &self.order)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[must_use]
pub struct HandlerDefBuilder {
    type_name: String,
    module: String,
    schema: Option<SchemaId>,
    capability: Capability,
    required: Vec<String>,
    order: Vec<String>,
    hooks: HookTable,
    initialize: InitializeHook,
}

impl HandlerDefBuilder {
    pub fn schema(mut self, schema: impl Into<SchemaId>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Replace the required-key list.
    pub fn required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Append a required key unless already present.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    /// Explicit key order for serialization, emitted before the remaining
    /// required keys.
    pub fn order<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate_key<F>(mut self, key: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Field) -> Result<(), MeritError> + Send + Sync + 'static,
    {
        self.hooks.set_validate(key, hook);
        self
    }

    pub fn load_key<F>(mut self, key: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Registry, Value) -> Result<Field, MeritError> + Send + Sync + 'static,
    {
        self.hooks.set_load(key, hook);
        self
    }

    pub fn dump_key<F>(mut self, key: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Field) -> Result<Value, MeritError> + Send + Sync + 'static,
    {
        self.hooks.set_dump(key, hook);
        self
    }

    /// Override the inherited `initialize` hook.
    pub fn initialize<F>(mut self, initialize: F) -> Self
    where
        F: Fn(&mut Handler) -> Result<(), MeritError> + Send + Sync + 'static,
    {
        self.initialize = Arc::new(initialize);
        self
    }

    /// Wrap the inherited `initialize` hook: the parent's runs first.
    pub fn then_initialize<F>(mut self, initialize: F) -> Self
    where
        F: Fn(&mut Handler) -> Result<(), MeritError> + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.initialize);
        self.initialize = Arc::new(move |handler: &mut Handler| {
            parent(handler)?;
            initialize(handler)
        });
        self
    }

    /// # Errors
    ///
    /// Returns [`MeritError::InvalidSchema`] if no schema was declared, or
    /// the declared identifier is empty or contains an empty literal.
    pub fn build(self) -> Result<Arc<HandlerDef>, MeritError> {
        let schema = self.schema.ok_or_else(|| {
            MeritError::InvalidSchema(format!("{}: no schema declared", self.type_name))
        })?;
        schema.check().map_err(|error| match error {
            MeritError::InvalidSchema(reason) => {
                MeritError::InvalidSchema(format!("{}: {reason}", self.type_name))
            }
            other => other,
        })?;

        let mut emit_order = self.order.clone();
        for key in &self.required {
            if !emit_order.contains(key) {
                emit_order.push(key.clone());
            }
        }

        Ok(Arc::new(HandlerDef {
            type_name: self.type_name,
            module: self.module,
            schema,
            capability: self.capability,
            required: self.required,
            order: self.order,
            emit_order,
            hooks: self.hooks,
            initialize: self.initialize,
        }))
    }
}
