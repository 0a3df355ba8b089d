//! # merit-contrib
//!
//! Standard Merit variants and the probes that feed them.
//!
//! | schema                   | definition                        |
//! |--------------------------|-----------------------------------|
//! | `context:platform:v1`    | [`context::platform_context`]     |
//! | `context:process:v1`     | [`context::process_context`]      |
//! | `resource:filebase:v1`   | [`resource::file_resource`]       |
//! | `resource:s3filebase:v1` | [`resource::s3_file_resource`]    |
//! | `global:default:v1`      | [`default::default_root`]         |
//!
//! [`standard_registry`] registers these together with the base variants.

pub mod context;
pub mod default;
pub mod probe;
pub mod resource;
pub mod standard;

pub use probe::{FileProbe, PlatformInfo, Probes, ProcessInfo, System};
pub use standard::{StandardHandlers, standard_registry};
