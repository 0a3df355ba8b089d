//! Handler instances.
//!
//! A [`Handler`] owns exactly one [`Document`] and knows, through its
//! [`HandlerDef`], how to validate, load and dump it:
//!
//! - `validate` checks required keys in declaration order, reporting the
//!   first missing one as `Missing: <key>`, and runs the validator of each
//!   required key. Validators on other keys are never consulted.
//! - `load` runs per-key load hooks over a raw mapping, validates the result
//!   and only then replaces the document. A failed load leaves the handler
//!   untouched.
//! - `dump` validates and emits `schema`, then the ordered keys, then every
//!   other key in insertion order.
//!
//! Root handlers additionally compose contexts and resources through
//! [`Handler::add_context`] and [`Handler::add_resource`].

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::attribute::{DESCRIPTION, NAME, NAMESPACE, PATH};
use crate::codec::{self, Format};
use crate::definition::{CONTEXTS_KEY, Capability, HandlerDef, RESOURCES_KEY};
use crate::document::{Document, Field, SCHEMA_KEY};
use crate::error::MeritError;
use crate::registry::Registry;
use crate::schema_id::SchemaId;

/// Width given up by each level of nesting in [`Handler::prettyprint`].
const NESTED_WIDTH_STEP: usize = 20;

/// Draws a two-column table. Implemented by presentation layers.
pub trait TableRenderer {
    fn render(&self, headers: [&str; 2], rows: &[[String; 2]], max_width: usize) -> String;
}

#[derive(Clone)]
pub struct Handler {
    def: Arc<HandlerDef>,
    metadata: Document,
}

impl Handler {
    /// Construct an instance and run the definition's `initialize` hook.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the `initialize` hook.
    pub fn new(def: Arc<HandlerDef>) -> Result<Self, MeritError> {
        let mut handler = Self {
            def,
            metadata: Document::new(),
        };
        let def = Arc::clone(&handler.def);
        def.initialize(&mut handler)?;
        Ok(handler)
    }

    #[must_use]
    pub const fn definition(&self) -> &Arc<HandlerDef> {
        &self.def
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaId {
        self.def.schema()
    }

    #[must_use]
    pub fn capability(&self) -> Capability {
        self.def.capability()
    }

    #[must_use]
    pub const fn metadata(&self) -> &Document {
        &self.metadata
    }

    pub const fn metadata_mut(&mut self) -> &mut Document {
        &mut self.metadata
    }

    /// Replace the whole document without validation. Used by `initialize`
    /// hooks to seed defaults.
    pub fn set_metadata(&mut self, metadata: Document) {
        self.metadata = metadata;
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if the key is unset.
    pub fn get(&self, key: &str) -> Result<&Field, MeritError> {
        self.metadata
            .get(key)
            .ok_or_else(|| MeritError::NoAttribute(key.to_string()))
    }

    /// On a root handler an empty array stored under `contexts` or
    /// `resources` becomes an empty handler sequence, the same shape `load`
    /// produces.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Field>) {
        let key = key.into();
        let mut field = value.into();
        if self.holds_children(&key)
            && matches!(&field, Field::Value(Value::Array(items)) if items.is_empty())
        {
            field = Field::Handlers(Vec::new());
        }
        self.metadata.insert(key, field);
    }

    fn holds_children(&self, key: &str) -> bool {
        self.capability() == Capability::Root && (key == CONTEXTS_KEY || key == RESOURCES_KEY)
    }

    // -- standard attributes ------------------------------------------------

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset.
    pub fn name(&self) -> Result<&str, MeritError> {
        NAME.get_str(self)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        NAME.set(self, name.into());
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset.
    pub fn description(&self) -> Result<&str, MeritError> {
        DESCRIPTION.get_str(self)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        DESCRIPTION.set(self, description.into());
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset.
    pub fn namespace(&self) -> Result<&str, MeritError> {
        NAMESPACE.get_str(self)
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        NAMESPACE.set(self, namespace.into());
    }

    /// # Errors
    ///
    /// Returns [`MeritError::NoAttribute`] if unset.
    pub fn path(&self) -> Result<&str, MeritError> {
        PATH.get_str(self)
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        PATH.set(self, path.into());
    }

    // -- validate / load / dump ---------------------------------------------

    /// Validate the handler's own document.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidMetadata`] naming the first missing
    /// required key, or whatever a per-key validator returns.
    pub fn validate(&self) -> Result<(), MeritError> {
        self.validate_document(&self.metadata)
    }

    /// Validate an arbitrary document against this handler's definition.
    ///
    /// # Errors
    ///
    /// See [`Handler::validate`].
    pub fn validate_document(&self, document: &Document) -> Result<(), MeritError> {
        let hooks = self.def.hooks();
        for key in self.def.required() {
            let field = document.get(key).ok_or_else(|| MeritError::missing(key))?;
            if let Some(validate) = hooks.validator(key) {
                validate(field)?;
            }
        }
        Ok(())
    }

    /// Load a raw mapping into this handler.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidMetadata`] if `document` is not a
    /// mapping or fails validation, and propagates load hook failures
    /// (including nested dispatch failures).
    pub fn load(&mut self, registry: &Registry, document: Value) -> Result<(), MeritError> {
        let Value::Object(raw) = document else {
            return Err(MeritError::InvalidMetadata(
                "Metadata not a mapping".to_string(),
            ));
        };

        let hooks = self.def.hooks();
        let mut loaded = Document::new();
        for (key, value) in raw {
            if key == SCHEMA_KEY {
                continue;
            }
            let field = match hooks.loader(&key) {
                Some(load) => load(registry, value)?,
                None => Field::Value(value),
            };
            loaded.insert(key, field);
        }

        self.validate_document(&loaded)?;
        self.metadata = loaded;
        Ok(())
    }

    /// Parse `text` and [`load`](Handler::load) it.
    ///
    /// # Errors
    ///
    /// Returns a decode error or any [`Handler::load`] failure.
    pub fn loads(&mut self, registry: &Registry, text: &str) -> Result<(), MeritError> {
        self.loads_as(registry, text, Format::Json)
    }

    /// # Errors
    ///
    /// Returns a decode error or any [`Handler::load`] failure.
    pub fn loads_as(
        &mut self,
        registry: &Registry,
        text: &str,
        format: Format,
    ) -> Result<(), MeritError> {
        let document = format.parse(text)?;
        self.load(registry, document)
    }

    /// Ordered wire mapping of this handler.
    ///
    /// # Errors
    ///
    /// Returns the validation failure, or a dump hook failure.
    pub fn dump(&self) -> Result<Map<String, Value>, MeritError> {
        self.validate()?;

        let mut out = Map::new();
        out.insert(SCHEMA_KEY.to_string(), self.def.schema().to_value());

        for key in self.def.emit_order() {
            if let Some(field) = self.metadata.get(key) {
                out.insert(key.clone(), self.dump_field(key, field)?);
            }
        }

        for (key, field) in self.metadata.iter() {
            if out.contains_key(key) {
                continue;
            }
            out.insert(key.to_string(), self.dump_field(key, field)?);
        }

        Ok(out)
    }

    /// JSON text with a four-space indent.
    ///
    /// # Errors
    ///
    /// See [`Handler::dump`].
    pub fn dumps(&self) -> Result<String, MeritError> {
        self.dumps_as(Format::Json, codec::DEFAULT_INDENT)
    }

    /// # Errors
    ///
    /// See [`Handler::dump`].
    pub fn dumps_as(&self, format: Format, indent: usize) -> Result<String, MeritError> {
        format.render(&Value::Object(self.dump()?), indent)
    }

    fn dump_field(&self, key: &str, field: &Field) -> Result<Value, MeritError> {
        match self.def.hooks().dumper(key) {
            Some(dump) => dump(field),
            None => field.to_value(),
        }
    }

    // -- root composition ---------------------------------------------------

    /// Attach a context and register its definition if no handler claims its
    /// schema yet.
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidContext`] for `None` or a non-context
    /// handler, the context's own validation failure, or any registration
    /// failure other than a duplicate schema.
    pub fn add_context(
        &mut self,
        registry: &mut Registry,
        context: Option<Handler>,
    ) -> Result<(), MeritError> {
        let context =
            context.ok_or_else(|| MeritError::InvalidContext("Null context".to_string()))?;
        self.attach(Some(registry), Capability::Context, context)
    }

    /// Resource counterpart of [`Handler::add_context`].
    ///
    /// # Errors
    ///
    /// Returns [`MeritError::InvalidResource`] for `None` or a non-resource
    /// handler, the resource's own validation failure, or any registration
    /// failure other than a duplicate schema.
    pub fn add_resource(
        &mut self,
        registry: &mut Registry,
        resource: Option<Handler>,
    ) -> Result<(), MeritError> {
        let resource =
            resource.ok_or_else(|| MeritError::InvalidResource("Null resource".to_string()))?;
        self.attach(Some(registry), Capability::Resource, resource)
    }

    /// Attach a context without touching any registry.
    ///
    /// # Errors
    ///
    /// As [`Handler::add_context`], minus registration.
    pub fn push_context(&mut self, context: Self) -> Result<(), MeritError> {
        self.attach(None, Capability::Context, context)
    }

    /// Attach a resource without touching any registry.
    ///
    /// # Errors
    ///
    /// As [`Handler::add_resource`], minus registration.
    pub fn push_resource(&mut self, resource: Self) -> Result<(), MeritError> {
        self.attach(None, Capability::Resource, resource)
    }

    #[must_use]
    pub fn contexts(&self) -> &[Self] {
        self.children(Capability::Context)
    }

    #[must_use]
    pub fn resources(&self) -> &[Self] {
        self.children(Capability::Resource)
    }

    fn children(&self, kind: Capability) -> &[Self] {
        kind.collection_key()
            .and_then(|key| self.metadata.get(key))
            .and_then(Field::as_handlers)
            .unwrap_or_default()
    }

    fn attach(
        &mut self,
        registry: Option<&mut Registry>,
        kind: Capability,
        child: Self,
    ) -> Result<(), MeritError> {
        let reject = |reason: String| match kind {
            Capability::Resource => MeritError::InvalidResource(reason),
            _ => MeritError::InvalidContext(reason),
        };

        if child.capability() != kind {
            return Err(reject(format!(
                "{} is a {} handler, not a {kind}",
                child.def.type_name(),
                child.capability()
            )));
        }
        if self.capability() != Capability::Root {
            return Err(reject(format!(
                "{} is not a root document",
                self.def.type_name()
            )));
        }

        child.validate()?;

        let Some(key) = kind.collection_key() else {
            return Err(reject(format!("{kind} handlers cannot be attached")));
        };
        let slot = self.metadata.entry(key);
        if matches!(slot, Field::Value(Value::Array(items)) if items.is_empty()) {
            *slot = Field::Handlers(Vec::new());
        }
        if !matches!(slot, Field::Handlers(_)) {
            return Err(MeritError::InvalidMetadata(format!(
                "{key} is not a sequence of handlers"
            )));
        }

        if let Some(registry) = registry {
            match registry.register(Arc::clone(&child.def)) {
                Ok(()) => {}
                Err(MeritError::DuplicateSchema { schema, handler }) => {
                    tracing::debug!(%schema, %handler, "schema already registered; keeping existing handler");
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(Field::Handlers(children)) = self.metadata.get_mut(key) {
            children.push(child);
        }
        Ok(())
    }

    // -- presentation -------------------------------------------------------

    /// Dimension/Summary table of this handler; nested handlers are drawn
    /// recursively with a narrower width.
    #[must_use]
    pub fn prettyprint(&self, renderer: &dyn TableRenderer, max_width: usize) -> String {
        let mut rows = vec![[SCHEMA_KEY.to_string(), self.def.schema().to_string()]];

        for key in self.dimension_order() {
            let Some(field) = self.metadata.get(&key) else {
                continue;
            };
            let summary = match field {
                Field::Handlers(children) => children
                    .iter()
                    .map(|child| {
                        child.prettyprint(renderer, max_width.saturating_sub(NESTED_WIDTH_STEP))
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                Field::Value(Value::Array(items)) => items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
                Field::Value(value) => scalar_text(value),
            };
            rows.push([key, summary]);
        }

        renderer.render(["Dimension", "Summary"], &rows, max_width)
    }

    /// Ordered keys first, then every other key sorted.
    fn dimension_order(&self) -> Vec<String> {
        let mut keys = self.def.emit_order().to_vec();
        let mut rest: Vec<&str> = self
            .metadata
            .keys()
            .filter(|key| *key != SCHEMA_KEY && !keys.iter().any(|k| k == key))
            .collect();
        rest.sort_unstable();
        keys.extend(rest.into_iter().map(str::to_string));
        keys
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.def, &other.def) && self.metadata == other.metadata
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("type_name", &self.def.type_name())
            .field("schema", self.def.schema())
            .field("metadata", &self.metadata)
            .finish()
    }
}
