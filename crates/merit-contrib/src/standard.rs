//! Init-time registration manifest for the standard variants.

use std::sync::Arc;

use merit_core::base;
use merit_core::{HandlerDef, MeritError, Registry};

use crate::context::{platform_context, process_context};
use crate::default::default_root;
use crate::probe::Probes;
use crate::resource::{file_resource, s3_file_resource};

/// Every standard definition, built once against one probe set.
#[derive(Debug, Clone)]
pub struct StandardHandlers {
    pub global_base: Arc<HandlerDef>,
    pub context_base: Arc<HandlerDef>,
    pub resource_base: Arc<HandlerDef>,
    pub platform: Arc<HandlerDef>,
    pub process: Arc<HandlerDef>,
    pub file: Arc<HandlerDef>,
    pub s3_file: Arc<HandlerDef>,
    pub default: Arc<HandlerDef>,
}

impl StandardHandlers {
    /// # Errors
    ///
    /// Only fails if a built-in identifier were malformed.
    pub fn new(probes: &Probes) -> Result<Self, MeritError> {
        let platform = platform_context(Arc::clone(&probes.platform))?;
        let process = process_context(Arc::clone(&probes.process))?;
        let default = default_root(Arc::clone(&platform), Arc::clone(&process))?;
        Ok(Self {
            global_base: base::global_base()?,
            context_base: base::context_base()?,
            resource_base: base::resource_base()?,
            platform,
            process,
            file: file_resource(Arc::clone(&probes.files))?,
            s3_file: s3_file_resource()?,
            default,
        })
    }

    /// Registration order.
    #[must_use]
    pub fn all(&self) -> [&Arc<HandlerDef>; 8] {
        [
            &self.global_base,
            &self.context_base,
            &self.resource_base,
            &self.platform,
            &self.process,
            &self.file,
            &self.s3_file,
            &self.default,
        ]
    }

    /// # Errors
    ///
    /// Returns [`MeritError::DuplicateSchema`] if `registry` already claims
    /// a standard schema.
    pub fn register_all(&self, registry: &mut Registry) -> Result<(), MeritError> {
        for def in self.all() {
            registry.register(Arc::clone(def))?;
        }
        Ok(())
    }
}

/// A registry holding every standard variant, plus the definitions it holds.
///
/// # Errors
///
/// Only fails if a built-in identifier were malformed.
pub fn standard_registry(probes: &Probes) -> Result<(Registry, StandardHandlers), MeritError> {
    let handlers = StandardHandlers::new(probes)?;
    let mut registry = Registry::new();
    handlers.register_all(&mut registry)?;
    tracing::debug!(handlers = registry.len(), "standard registry ready");
    Ok((registry, handlers))
}
