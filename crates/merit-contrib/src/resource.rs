//! File-backed resources.

use std::path::Path;
use std::sync::Arc;

use merit_core::attribute::{ATTRIBUTES, PATH};
use merit_core::base;
use merit_core::{Field, Handler, HandlerDef, MeritError};
use serde_json::{Value, json};

use crate::probe::FileProbe;

pub const FILE: &str = "resource:filebase:v1";
pub const S3_FILE: &str = "resource:s3filebase:v1";

pub const S3PATH: &str = "s3path";

/// `resource:filebase:v1`: a file on local disk. `path` must name an
/// existing file according to `files`.
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn file_resource(files: Arc<dyn FileProbe>) -> Result<Arc<HandlerDef>, MeritError> {
    base::resource_builder("File")
        .schema(FILE)
        .initialize(|handler: &mut Handler| {
            handler.set_name("File");
            handler.set_description("File saved on disk");
            ATTRIBUTES.set(handler, json!({}));
            Ok(())
        })
        .require(PATH.key())
        .require(ATTRIBUTES.key())
        .validate_key(PATH.key(), move |field| validate_path(files.as_ref(), field))
        .build()
}

fn validate_path(files: &dyn FileProbe, field: &Field) -> Result<(), MeritError> {
    let Some(path) = field.as_str() else {
        return Err(MeritError::InvalidMetadata(
            "Invalid path for file resource specified. Not a string".to_string(),
        ));
    };
    if !files.exists(Path::new(path)) {
        tracing::debug!(path, "file resource points at a missing file");
        return Err(MeritError::InvalidMetadata(
            "Invalid path for file resource specified. Missing file".to_string(),
        ));
    }
    Ok(())
}

/// `resource:s3filebase:v1`: an object in S3. Only presence of `s3path` and
/// `attributes` is checked.
///
/// # Errors
///
/// Only fails if the built-in identifier were malformed.
pub fn s3_file_resource() -> Result<Arc<HandlerDef>, MeritError> {
    base::resource_builder("S3File")
        .schema(S3_FILE)
        .initialize(|handler: &mut Handler| {
            handler.set_name("File");
            handler.set_description("S3 file");
            Ok(())
        })
        .require(S3PATH)
        .require(ATTRIBUTES.key())
        .build()
}

/// Set the `attributes` mapping of a file resource.
pub fn set_attributes(handler: &mut Handler, attributes: serde_json::Map<String, Value>) {
    ATTRIBUTES.set(handler, Value::Object(attributes));
}
