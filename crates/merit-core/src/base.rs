//! Base variants: the abstract root, context and resource definitions that
//! concrete variants extend.

use std::sync::Arc;

use serde_json::Value;

use crate::definition::{CONTEXTS_KEY, Capability, HandlerDef, HandlerDefBuilder, RESOURCES_KEY};
use crate::document::Field;
use crate::error::MeritError;
use crate::handler::Handler;
use crate::registry::Registry;

pub const GLOBAL_BASE: &str = "global:base:v1";
pub const CONTEXT_BASE: &str = "context:base:v1";
pub const RESOURCE_BASE: &str = "resource:base:v1";

/// Builder for a context variant; `initialize` is a no-op until overridden.
#[track_caller]
pub fn context_builder(type_name: impl Into<String>) -> HandlerDefBuilder {
    HandlerDef::builder(type_name, Capability::Context, |_| Ok(()))
}

/// Builder for a resource variant; `initialize` is a no-op until overridden.
#[track_caller]
pub fn resource_builder(type_name: impl Into<String>) -> HandlerDefBuilder {
    HandlerDef::builder(type_name, Capability::Resource, |_| Ok(()))
}

/// Builder for a root variant.
///
/// Instances start with empty `contexts` and `resources`; both keys load by
/// dispatching each element through the registry and reject elements of the
/// wrong capability.
#[track_caller]
pub fn root_builder(type_name: impl Into<String>) -> HandlerDefBuilder {
    HandlerDef::builder(type_name, Capability::Root, |handler: &mut Handler| {
        handler.set(CONTEXTS_KEY, Field::Handlers(Vec::new()));
        handler.set(RESOURCES_KEY, Field::Handlers(Vec::new()));
        Ok(())
    })
    .load_key(CONTEXTS_KEY, |registry, value| {
        load_children(registry, value, Capability::Context)
    })
    .load_key(RESOURCES_KEY, |registry, value| {
        load_children(registry, value, Capability::Resource)
    })
    .validate_key(CONTEXTS_KEY, |field| check_children(field, CONTEXTS_KEY))
    .validate_key(RESOURCES_KEY, |field| check_children(field, RESOURCES_KEY))
}

fn load_children(
    registry: &Registry,
    value: Value,
    kind: Capability,
) -> Result<Field, MeritError> {
    let Value::Array(items) = value else {
        return Err(MeritError::InvalidMetadata(format!(
            "{kind} field is not a sequence"
        )));
    };
    items
        .into_iter()
        .map(|item| registry.dispatch_as(item, kind))
        .collect::<Result<Vec<_>, _>>()
        .map(Field::Handlers)
}

fn check_children(field: &Field, key: &str) -> Result<(), MeritError> {
    match field {
        Field::Handlers(_) => Ok(()),
        Field::Value(Value::Array(items)) if items.is_empty() => Ok(()),
        Field::Value(_) => Err(MeritError::InvalidMetadata(format!(
            "{key} must hold handlers"
        ))),
    }
}

/// `global:base:v1`
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn global_base() -> Result<Arc<HandlerDef>, MeritError> {
    root_builder("GlobalBase").schema(GLOBAL_BASE).build()
}

/// `context:base:v1`
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn context_base() -> Result<Arc<HandlerDef>, MeritError> {
    context_builder("ContextBase").schema(CONTEXT_BASE).build()
}

/// `resource:base:v1`
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn resource_base() -> Result<Arc<HandlerDef>, MeritError> {
    resource_builder("ResourceBase").schema(RESOURCE_BASE).build()
}

/// The three base definitions, in registration order.
///
/// # Errors
///
/// See [`global_base`].
pub fn definitions() -> Result<Vec<Arc<HandlerDef>>, MeritError> {
    Ok(vec![global_base()?, context_base()?, resource_base()?])
}
