//! `global:default:v1`
//!
//! A root document that starts with a platform context and a process
//! context describing where and by whom it was produced.

use std::sync::Arc;

use merit_core::base;
use merit_core::{Handler, HandlerDef, MeritError};

pub const DEFAULT: &str = "global:default:v1";

/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn default_root(
    platform: Arc<HandlerDef>,
    process: Arc<HandlerDef>,
) -> Result<Arc<HandlerDef>, MeritError> {
    base::root_builder("Default")
        .schema(DEFAULT)
        .then_initialize(move |handler: &mut Handler| {
            handler.push_context(platform.instantiate()?)?;
            handler.push_context(process.instantiate()?)?;
            Ok(())
        })
        .build()
}
