//! # merit-core
//!
//! Schema-tagged metadata documents for Merit.
//!
//! This crate provides:
//! - [`SchemaId`]: the identifier naming the shape of a document
//! - [`HandlerDef`] and [`Handler`]: validate, load and dump one document
//! - [`Registry`]: explicit schema → definition table and the tagged dispatcher
//! - [`base`]: the root, context and resource base variants
//!
//! ## Architecture
//!
//! Every dispatched level of a wire document carries a `schema` field. The
//! registry reads it, instantiates the matching definition and loads the
//! document; a root's `contexts` and `resources` are dispatched recursively
//! by its load hooks. Concrete variants live in `merit-contrib` and are
//! registered explicitly at startup.

pub mod attribute;
pub mod base;
pub mod codec;
pub mod definition;
pub mod document;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod registry;
pub mod schema_id;

pub use attribute::Attribute;
pub use codec::Format;
pub use definition::{Capability, HandlerDef, HandlerDefBuilder};
pub use document::{Document, Field, SCHEMA_KEY};
pub use error::MeritError;
pub use handler::{Handler, TableRenderer};
pub use registry::{Registry, RegistryEntry};
pub use schema_id::SchemaId;
