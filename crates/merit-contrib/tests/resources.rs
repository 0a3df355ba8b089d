//! Resource attachment on a default root, including file-backed resources.

mod common;

use std::io::Write;

use common::{default_merit, fixed_probes, host_probes, registry};
use merit_contrib::resource::{FILE, S3_FILE, S3PATH, set_attributes};
use merit_core::base;
use merit_core::{Handler, MeritError};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn none_resource_is_invalid() {
    let (mut registry, handlers) = registry(&fixed_probes(&[]));
    let mut root = default_merit(&handlers);
    let err = root.add_resource(&mut registry, None).unwrap_err();
    assert!(matches!(err, MeritError::InvalidResource(_)));
}

#[test]
fn context_is_not_a_resource() {
    let (mut registry, handlers) = registry(&fixed_probes(&[]));
    let mut root = default_merit(&handlers);
    let def = base::context_builder("Resource").schema("Hello").build().unwrap();

    let err = root
        .add_resource(&mut registry, Some(def.instantiate().unwrap()))
        .unwrap_err();
    assert!(matches!(err, MeritError::InvalidResource(_)));
}

#[test]
fn resource_without_name_or_description_is_invalid() {
    let (mut registry, handlers) = registry(&fixed_probes(&[]));
    let mut root = default_merit(&handlers);
    let def = base::resource_builder("Resource").schema("Hello").build().unwrap();

    let err = root
        .add_resource(&mut registry, Some(def.instantiate().unwrap()))
        .unwrap_err();
    assert!(err.to_string().contains("Missing: name"));

    let mut resource = def.instantiate().unwrap();
    resource.set_name("helloattr");
    let err = root.add_resource(&mut registry, Some(resource.clone())).unwrap_err();
    assert!(err.to_string().contains("Missing: description"));

    resource.set_description("Long description");
    root.add_resource(&mut registry, Some(resource)).unwrap();
    assert_eq!(root.resources().len(), 1);
}

fn acme_file(handlers: &merit_contrib::StandardHandlers, schema: &str) -> Handler {
    let def = handlers.file.extend("Resource").schema(schema).build().unwrap();
    let mut resource = def.instantiate().unwrap();
    resource.set_name("helloattr");
    resource.set_description("Long string");
    resource
}

#[test]
fn file_resource_requires_path() {
    let (mut registry, handlers) = registry(&host_probes());
    let mut root = default_merit(&handlers);

    let err = root
        .add_resource(&mut registry, Some(acme_file(&handlers, "Hello")))
        .unwrap_err();
    assert!(err.to_string().contains("Missing: path"));
}

#[test]
fn file_resource_rejects_missing_file() {
    let (mut registry, handlers) = registry(&host_probes());
    let mut root = default_merit(&handlers);
    let dir = tempfile::tempdir().unwrap();
    let mut resource = acme_file(&handlers, "Hello");
    resource.set_path(dir.path().join("hello").to_string_lossy());

    let err = root.add_resource(&mut registry, Some(resource)).unwrap_err();
    assert!(matches!(err, MeritError::InvalidMetadata(_)));
    assert!(err.to_string().contains("Missing file"));
}

#[test]
fn file_resource_rejects_non_string_path() {
    let (mut registry, handlers) = registry(&host_probes());
    let mut root = default_merit(&handlers);
    let mut resource = acme_file(&handlers, "Hello");
    resource.set("path", json!(17));

    let err = root.add_resource(&mut registry, Some(resource)).unwrap_err();
    assert!(err.to_string().contains("Not a string"));
}

#[test]
fn file_resource_accepts_existing_file() {
    let (mut registry, handlers) = registry(&host_probes());
    let mut root = default_merit(&handlers);
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut resource = acme_file(&handlers, "Hello");
    resource.set_path(file.path().to_string_lossy());

    root.add_resource(&mut registry, Some(resource)).unwrap();
    assert_eq!(root.resources().len(), 1);
    assert!(registry.resolve("Hello").is_ok());
}

#[test]
fn file_resource_with_attributes_round_trips() {
    let (mut registry, handlers) = registry(&host_probes());
    let mut root = default_merit(&handlers);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"Hello").unwrap();
    let mut resource = acme_file(&handlers, "resource:acmefile:v1");
    resource.set_name("runlog");
    resource.set_description("Run log from execution");
    resource.set_path(file.path().to_string_lossy());
    let mut attributes = serde_json::Map::new();
    attributes.insert("size".to_string(), json!(5));
    set_attributes(&mut resource, attributes);

    root.add_resource(&mut registry, Some(resource)).unwrap();

    let text = root.dumps().unwrap();
    let copy = registry
        .dispatch_str(&text, merit_core::Format::Json)
        .unwrap();
    assert_eq!(copy.resources()[0].schema().primary(), "resource:acmefile:v1");
    assert_eq!(
        copy.resources()[0].get("attributes").unwrap().as_value(),
        Some(&json!({"size": 5}))
    );
    assert_eq!(copy.dumps().unwrap(), text);
}

#[test]
fn file_probe_decides_existence() {
    let (mut registry, handlers) = registry(&fixed_probes(&["/data/run.log"]));
    let mut root = default_merit(&handlers);

    let mut resource = handlers.file.instantiate().unwrap();
    resource.set_path("/data/run.log");
    root.add_resource(&mut registry, Some(resource)).unwrap();

    let mut resource = handlers.file.instantiate().unwrap();
    resource.set_path("/data/other.log");
    assert!(root.add_resource(&mut registry, Some(resource)).is_err());
}

#[test]
fn standard_file_resources_have_defaults() {
    let (_, handlers) = registry(&fixed_probes(&[]));

    let file = handlers.file.instantiate().unwrap();
    assert_eq!(file.schema().primary(), FILE);
    assert_eq!(file.description().unwrap(), "File saved on disk");
    assert_eq!(file.get("attributes").unwrap().as_value(), Some(&json!({})));

    let mut s3 = handlers.s3_file.instantiate().unwrap();
    assert_eq!(s3.schema().primary(), S3_FILE);
    assert_eq!(s3.description().unwrap(), "S3 file");
    assert!(s3.validate().unwrap_err().to_string().contains("Missing: s3path"));

    s3.set(S3PATH, "s3://bucket/key");
    assert!(s3.validate().unwrap_err().to_string().contains("Missing: attributes"));
    s3.set("attributes", json!({}));
    s3.validate().unwrap();
}
