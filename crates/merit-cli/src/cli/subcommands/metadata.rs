use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Metadata document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MetadataCommands {
    /// Load a document and print it.
    Show(MetadataFileArgs),
    /// Load a document and check it against its handler.
    Validate(MetadataFileArgs),
    /// Build a global:default:v1 document.
    New(MetadataNewArgs),
}

#[derive(Clone, Debug, Args)]
pub struct MetadataFileArgs {
    /// Document file (JSON or YAML).
    pub file: PathBuf,
    /// Decode as YAML regardless of extension.
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Clone, Debug, Args)]
pub struct MetadataNewArgs {
    #[arg(long)]
    pub namespace: String,
    #[arg(long)]
    pub path: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    /// File to attach as a resource:filebase:v1 resource (repeatable).
    #[arg(long = "resource", value_name = "FILE")]
    pub resources: Vec<PathBuf>,
    /// Write the document here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
