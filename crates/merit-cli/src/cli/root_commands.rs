use clap::Subcommand;

use crate::cli::subcommands::{MetadataCommands, SchemaCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Inspect registered schemas.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// Build, show and validate metadata documents.
    Metadata {
        #[command(subcommand)]
        action: MetadataCommands,
    },
}
