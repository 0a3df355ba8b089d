//! Per-key hook table.
//!
//! A handler definition may attach up to three hooks to any key:
//! - `validate`: checks the value during validation,
//! - `load`: turns the raw wire value into a [`Field`] (used to dispatch
//!   nested contexts and resources),
//! - `dump`: turns the in-memory [`Field`] back into wire JSON.
//!
//! Lookup is a plain map probe by key name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::document::Field;
use crate::error::MeritError;
use crate::handler::Handler;
use crate::registry::Registry;

pub type ValidateHook = Arc<dyn Fn(&Field) -> Result<(), MeritError> + Send + Sync>;
pub type LoadHook = Arc<dyn Fn(&Registry, Value) -> Result<Field, MeritError> + Send + Sync>;
pub type DumpHook = Arc<dyn Fn(&Field) -> Result<Value, MeritError> + Send + Sync>;

/// Seeds the default document of a freshly constructed handler.
pub type InitializeHook = Arc<dyn Fn(&mut Handler) -> Result<(), MeritError> + Send + Sync>;

/// Hooks attached to a single key.
#[derive(Clone, Default)]
pub struct KeyHooks {
    pub validate: Option<ValidateHook>,
    pub load: Option<LoadHook>,
    pub dump: Option<DumpHook>,
}

impl KeyHooks {
    /// Short names of the hooks present, e.g. `["validate", "load"]`.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::with_capacity(3);
        if self.validate.is_some() {
            kinds.push("validate");
        }
        if self.load.is_some() {
            kinds.push("load");
        }
        if self.dump.is_some() {
            kinds.push("dump");
        }
        kinds
    }
}

/// Mapping from key name to its hooks.
#[derive(Clone, Default)]
pub struct HookTable {
    by_key: HashMap<String, KeyHooks>,
}

impl HookTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_validate<F>(&mut self, key: impl Into<String>, hook: F)
    where
        F: Fn(&Field) -> Result<(), MeritError> + Send + Sync + 'static,
    {
        self.by_key.entry(key.into()).or_default().validate = Some(Arc::new(hook));
    }

    pub fn set_load<F>(&mut self, key: impl Into<String>, hook: F)
    where
        F: Fn(&Registry, Value) -> Result<Field, MeritError> + Send + Sync + 'static,
    {
        self.by_key.entry(key.into()).or_default().load = Some(Arc::new(hook));
    }

    pub fn set_dump<F>(&mut self, key: impl Into<String>, hook: F)
    where
        F: Fn(&Field) -> Result<Value, MeritError> + Send + Sync + 'static,
    {
        self.by_key.entry(key.into()).or_default().dump = Some(Arc::new(hook));
    }

    #[must_use]
    pub fn validator(&self, key: &str) -> Option<&ValidateHook> {
        self.by_key.get(key).and_then(|hooks| hooks.validate.as_ref())
    }

    #[must_use]
    pub fn loader(&self, key: &str) -> Option<&LoadHook> {
        self.by_key.get(key).and_then(|hooks| hooks.load.as_ref())
    }

    #[must_use]
    pub fn dumper(&self, key: &str) -> Option<&DumpHook> {
        self.by_key.get(key).and_then(|hooks| hooks.dump.as_ref())
    }

    /// Keys with at least one hook, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&KeyHooks> {
        self.by_key.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            if let Some(hooks) = self.by_key.get(key) {
                map.entry(&key, &hooks.kinds());
            }
        }
        map.finish()
    }
}
