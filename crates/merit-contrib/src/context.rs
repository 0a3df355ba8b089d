//! Platform and process contexts.

use std::sync::Arc;

use merit_core::base;
use merit_core::{Handler, HandlerDef, MeritError};
use serde_json::json;

use crate::probe::{PlatformInfo, ProcessInfo};

pub const PLATFORM: &str = "context:platform:v1";
pub const PROCESS: &str = "context:process:v1";

/// `context:platform:v1`: the host the document was produced on.
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn platform_context(info: Arc<dyn PlatformInfo>) -> Result<Arc<HandlerDef>, MeritError> {
    base::context_builder("PlatformContext")
        .schema(PLATFORM)
        .order(["name", "description", "node", "platform", "runtime"])
        .initialize(move |handler: &mut Handler| {
            handler.set_name("PlatformContext");
            handler.set_description("Host on which the execution took place");
            handler.set("node", info.node());
            handler.set("platform", info.platform());
            handler.set("runtime", info.runtime());
            Ok(())
        })
        .build()
}

/// `context:process:v1`: the process that produced the document.
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn process_context(info: Arc<dyn ProcessInfo>) -> Result<Arc<HandlerDef>, MeritError> {
    base::context_builder("ProcessContext")
        .schema(PROCESS)
        .order(["name", "description", "pid", "ppid", "cmdline"])
        .initialize(move |handler: &mut Handler| {
            handler.set_name("ProcessContext");
            handler.set_description("Process generating this metadata");
            handler.set("pid", json!(info.pid()));
            handler.set("ppid", json!(info.ppid()));
            handler.set("cmdline", json!(info.cmdline()));
            Ok(())
        })
        .build()
}
