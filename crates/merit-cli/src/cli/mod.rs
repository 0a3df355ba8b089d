use clap::Parser;
use merit_config::MeritConfig;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `merit` binary.
#[derive(Debug, Parser)]
#[command(name = "merit", version, about = "Merit - schema-tagged metadata documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to output.format from config)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Table coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self, config: &MeritConfig) -> GlobalFlags {
        GlobalFlags {
            format: self
                .format
                .unwrap_or_else(|| config.output.format.into()),
            color: self.color,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use merit_config::{DisplayFormat, MeritConfig};

    use super::{Cli, ColorMode, Commands, OutputFormat};
    use crate::cli::subcommands::{MetadataCommands, SchemaCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["merit", "--format", "table", "--verbose", "schema", "list"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Schema {
                action: SchemaCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["merit", "schema", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["merit", "--format", "xml", "schema", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_supplies_format_when_flag_is_absent() {
        let mut config = MeritConfig::default();
        config.output.format = DisplayFormat::Table;

        let cli = Cli::try_parse_from(["merit", "schema", "list"]).expect("cli should parse");
        assert_eq!(cli.global_flags(&config).format, OutputFormat::Table);

        let cli = Cli::try_parse_from(["merit", "-f", "raw", "schema", "list"])
            .expect("cli should parse");
        assert_eq!(cli.global_flags(&config).format, OutputFormat::Raw);
        assert_eq!(cli.global_flags(&config).color, ColorMode::Auto);
    }

    #[test]
    fn metadata_new_collects_repeated_resources() {
        let cli = Cli::try_parse_from([
            "merit",
            "metadata",
            "new",
            "--namespace",
            "test",
            "--path",
            "project=alpha/run=20134",
            "--name",
            "Run output",
            "--description",
            "Run output",
            "--resource",
            "a.log",
            "--resource",
            "b.log",
        ])
        .expect("cli should parse");

        let Commands::Metadata {
            action: MetadataCommands::New(args),
        } = cli.command
        else {
            panic!("expected metadata new");
        };
        assert_eq!(args.namespace, "test");
        assert_eq!(args.resources.len(), 2);
        assert!(args.output.is_none());
    }
}
