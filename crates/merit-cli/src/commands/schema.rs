use std::collections::BTreeMap;

use anyhow::Context;
use merit_core::Capability;
use serde::Serialize;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SchemaCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SchemaRow {
    schema: String,
    class: String,
    module: String,
    capability: Capability,
}

#[derive(Debug, Serialize)]
struct SchemaShowResponse {
    schema: Vec<String>,
    class: String,
    module: String,
    capability: Capability,
    required: Vec<String>,
    order: Vec<String>,
    hooks: BTreeMap<String, Vec<&'static str>>,
    json_schema: Value,
}

/// Handle `merit schema`.
pub fn handle(action: &SchemaCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SchemaCommands::List => output(&list_rows(ctx), flags.format),
        SchemaCommands::Show { schema } => output(&show(ctx, schema)?, flags.format),
    }
}

fn list_rows(ctx: &AppContext) -> Vec<SchemaRow> {
    ctx.registry
        .list()
        .into_iter()
        .map(|entry| SchemaRow {
            schema: entry.schema,
            class: entry.type_name,
            module: entry.module,
            capability: entry.capability,
        })
        .collect()
}

fn show(ctx: &AppContext, schema: &str) -> anyhow::Result<SchemaShowResponse> {
    let def = ctx
        .registry
        .resolve(schema)
        .with_context(|| format!("unknown schema '{schema}'; see `merit schema list`"))?;

    let hooks = def
        .hooks()
        .keys()
        .into_iter()
        .filter_map(|key| {
            def.hooks()
                .get(key)
                .map(|hooks| (key.to_string(), hooks.kinds()))
        })
        .collect();

    Ok(SchemaShowResponse {
        schema: def.schema().literals().to_vec(),
        class: def.type_name().to_string(),
        module: def.module().to_string(),
        capability: def.capability(),
        required: def.required().to_vec(),
        order: def.emit_order().to_vec(),
        hooks,
        json_schema: def.json_schema(),
    })
}
