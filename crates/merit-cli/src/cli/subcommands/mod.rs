mod metadata;
mod schema;

pub use metadata::{MetadataCommands, MetadataFileArgs, MetadataNewArgs};
pub use schema::SchemaCommands;
