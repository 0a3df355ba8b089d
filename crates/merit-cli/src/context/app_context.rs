use std::fs::File;
use std::path::Path;

use anyhow::Context;
use merit_config::MeritConfig;
use merit_contrib::{Probes, StandardHandlers, standard_registry};
use merit_core::{Format, Handler, Registry};
use serde_json::Value;

/// Everything a command handler needs: configuration plus a registry holding
/// the standard variants.
pub struct AppContext {
    pub config: MeritConfig,
    pub registry: Registry,
    pub handlers: StandardHandlers,
}

impl AppContext {
    pub fn init(config: MeritConfig, probes: &Probes) -> anyhow::Result<Self> {
        let (registry, handlers) =
            standard_registry(probes).context("failed to register standard handlers")?;
        tracing::debug!(handlers = registry.len(), "application context ready");
        Ok(Self {
            config,
            registry,
            handlers,
        })
    }

    /// `--yaml` wins, then the file extension, then `input.format`.
    #[must_use]
    pub fn input_format(&self, path: &Path, force_yaml: bool) -> Format {
        if force_yaml {
            return Format::Yaml;
        }
        match path.extension() {
            Some(_) => Format::from_path(path),
            None => self.config.input.format,
        }
    }

    /// Decode a document file without dispatching it.
    pub fn read_document(&self, path: &Path, force_yaml: bool) -> anyhow::Result<Value> {
        let format = self.input_format(path, force_yaml);
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        format
            .read(file)
            .with_context(|| format!("failed to decode {} as {format}", path.display()))
    }

    /// Decode and dispatch a document file.
    pub fn load_document(&self, path: &Path, force_yaml: bool) -> anyhow::Result<Handler> {
        let document = self.read_document(path, force_yaml)?;
        self.registry
            .dispatch(document)
            .with_context(|| format!("failed to load {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use merit_config::MeritConfig;
    use merit_core::Format;

    use super::*;

    #[test]
    fn input_format_precedence() {
        let mut config = MeritConfig::default();
        config.input.format = Format::Yaml;
        let ctx = AppContext::init(config, &Probes::system()).expect("context");

        assert_eq!(ctx.input_format(Path::new("doc.json"), true), Format::Yaml);
        assert_eq!(ctx.input_format(Path::new("doc.json"), false), Format::Json);
        assert_eq!(ctx.input_format(Path::new("doc"), false), Format::Yaml);
    }

    #[test]
    fn load_document_dispatches_file() {
        let ctx = AppContext::init(MeritConfig::default(), &Probes::system()).expect("context");
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("tempfile");
        writeln!(file, "schema: context:base:v1\nname: n\ndescription: d").expect("write");

        let handler = ctx.load_document(file.path(), false).expect("document loads");
        assert_eq!(handler.name().expect("name"), "n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let ctx = AppContext::init(MeritConfig::default(), &Probes::system()).expect("context");
        let err = ctx
            .load_document(Path::new("/nonexistent/doc.json"), false)
            .expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/doc.json"));
    }
}
