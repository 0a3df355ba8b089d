use clap::Subcommand;

/// Schema registry commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// List every registered schema with its handler.
    List,
    /// Show one handler definition and its JSON Schema.
    Show {
        /// Schema identifier, e.g. context:platform:v1.
        schema: String,
    },
}
