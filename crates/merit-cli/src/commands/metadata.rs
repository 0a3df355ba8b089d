use std::path::Path;

use anyhow::Context;
use merit_contrib::resource::set_attributes;
use merit_core::{Format, Handler};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::cli::subcommands::{MetadataCommands, MetadataFileArgs, MetadataNewArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, table::EntityTable};
use crate::ui;

#[derive(Debug, Serialize)]
struct ValidateResponse {
    file: String,
    schema: String,
    class: String,
    contexts: usize,
    resources: usize,
    valid: bool,
}

/// Handle `merit metadata`.
pub fn handle(
    action: &MetadataCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MetadataCommands::Show(args) => {
            let handler = ctx.load_document(&args.file, args.yaml)?;
            println!("{}", render_handler(&handler, flags.format)?);
            Ok(())
        }
        MetadataCommands::Validate(args) => output(&validate(ctx, args)?, flags.format),
        MetadataCommands::New(args) => {
            let root = build_default(ctx, args)?;
            let rendered = render_handler(&root, flags.format)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, format!("{rendered}\n"))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "metadata written");
                    Ok(())
                }
                None => {
                    println!("{rendered}");
                    Ok(())
                }
            }
        }
    }
}

fn render_handler(handler: &Handler, format: OutputFormat) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    match format {
        OutputFormat::Json => Ok(handler.dumps_as(Format::Json, prefs.indent)?),
        OutputFormat::Raw => Ok(serde_json::to_string(&Value::Object(handler.dump()?))?),
        OutputFormat::Table => {
            handler.validate()?;
            let renderer = EntityTable {
                color: prefs.table_color,
            };
            Ok(handler.prettyprint(&renderer, prefs.term_width))
        }
    }
}

fn validate(ctx: &AppContext, args: &MetadataFileArgs) -> anyhow::Result<ValidateResponse> {
    let document = ctx.read_document(&args.file, args.yaml)?;
    ctx.registry
        .check_wire(&document)
        .with_context(|| format!("{} does not match its wire schema", args.file.display()))?;

    let handler = ctx
        .registry
        .dispatch(document)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    handler.validate()?;

    Ok(ValidateResponse {
        file: args.file.display().to_string(),
        schema: handler.schema().to_string(),
        class: handler.definition().type_name().to_string(),
        contexts: handler.contexts().len(),
        resources: handler.resources().len(),
        valid: true,
    })
}

fn build_default(ctx: &mut AppContext, args: &MetadataNewArgs) -> anyhow::Result<Handler> {
    let mut root = ctx.handlers.default.instantiate()?;
    root.set_namespace(&args.namespace);
    root.set_path(&args.path);
    root.set_name(&args.name);
    root.set_description(&args.description);

    for path in &args.resources {
        let resource = file_resource(ctx, path)?;
        root.add_resource(&mut ctx.registry, Some(resource))
            .with_context(|| format!("failed to attach {}", path.display()))?;
    }

    root.validate()?;
    Ok(root)
}

fn file_resource(ctx: &AppContext, path: &Path) -> anyhow::Result<Handler> {
    let mut resource = ctx.handlers.file.instantiate()?;
    let absolute = std::path::absolute(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    resource.set_path(absolute.to_string_lossy());
    if let Some(name) = path.file_name() {
        resource.set_name(name.to_string_lossy());
    }

    if let Ok(meta) = std::fs::metadata(&absolute) {
        let mut attributes = Map::new();
        attributes.insert("size".to_string(), json!(meta.len()));
        set_attributes(&mut resource, attributes);
    }
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use merit_config::MeritConfig;
    use merit_contrib::Probes;
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctx() -> AppContext {
        AppContext::init(MeritConfig::default(), &Probes::system()).expect("context")
    }

    fn new_args(resources: Vec<PathBuf>) -> MetadataNewArgs {
        MetadataNewArgs {
            namespace: "test".to_string(),
            path: "project=alpha/run=20134".to_string(),
            name: "Run output".to_string(),
            description: "Run output".to_string(),
            resources,
            output: None,
        }
    }

    #[test]
    fn new_builds_default_with_file_resources() {
        let mut ctx = ctx();
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"Hello").expect("write");

        let root = build_default(&mut ctx, &new_args(vec![file.path().to_path_buf()]))
            .expect("document builds");

        assert_eq!(root.schema().primary(), "global:default:v1");
        assert_eq!(root.contexts().len(), 2);
        assert_eq!(root.resources().len(), 1);
        assert_eq!(
            root.resources()[0].get("attributes").expect("attributes").as_value(),
            Some(&json!({"size": 5}))
        );
    }

    #[test]
    fn new_rejects_missing_resource_file() {
        let mut ctx = ctx();
        let dir = tempfile::tempdir().expect("tempdir");
        let err = build_default(&mut ctx, &new_args(vec![dir.path().join("absent.log")]))
            .expect_err("missing file");
        assert!(format!("{err:#}").contains("Missing file"));
    }

    #[test]
    fn new_then_validate_round_trips() {
        let mut ctx = ctx();
        let root = build_default(&mut ctx, &new_args(Vec::new())).expect("document builds");

        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tempfile");
        file.write_all(root.dumps().expect("dumps").as_bytes())
            .expect("write");

        let response = validate(
            &ctx,
            &MetadataFileArgs {
                file: file.path().to_path_buf(),
                yaml: false,
            },
        )
        .expect("document validates");
        assert!(response.valid);
        assert_eq!(response.schema, "global:default:v1");
        assert_eq!(response.class, "Default");
        assert_eq!(response.contexts, 2);
        assert_eq!(response.resources, 0);
    }

    #[test]
    fn validate_reports_missing_required_key() {
        let ctx = ctx();
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tempfile");
        file.write_all(br#"{"schema": "context:base:v1", "name": "n"}"#)
            .expect("write");

        let err = validate(
            &ctx,
            &MetadataFileArgs {
                file: file.path().to_path_buf(),
                yaml: false,
            },
        )
        .expect_err("missing description");
        assert!(format!("{err:#}").contains("description"));
    }

    #[test]
    fn table_output_prettyprints_handler() {
        let mut ctx = ctx();
        let root = build_default(&mut ctx, &new_args(Vec::new())).expect("document builds");
        let table = render_handler(&root, OutputFormat::Table).expect("table renders");

        let header = table.lines().next().unwrap_or_default();
        assert!(header.contains("Dimension") && header.contains("Summary"));
        assert!(table.contains("PlatformContext"));
        assert!(table.contains("project=alpha/run=20134"));
    }

    #[test]
    fn raw_output_is_one_line_in_dump_order() {
        let mut ctx = ctx();
        let root = build_default(&mut ctx, &new_args(Vec::new())).expect("document builds");
        let raw = render_handler(&root, OutputFormat::Raw).expect("raw renders");
        assert!(!raw.contains('\n'));
        assert!(raw.starts_with(r#"{"schema":"global:default:v1","namespace":"test""#));
    }
}
