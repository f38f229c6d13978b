//! Field metadata: the whitelist of filterable and orderable fields
//!
//! - `field` - value types, field declarations and resolved descriptors
//! - `record` - per-record-type schema (fields plus base query parts)
//! - `registry` - immutable process-wide registry and the resolver trait
//! - `error` - registration errors
//!
//! Registration happens once, before any compilation. After that the
//! registry is read-only and may be shared freely across threads.

mod error;
mod field;
mod record;
mod registry;

pub use error::SchemaError;
pub use field::{FieldDescriptor, FieldSpec, ValueType};
pub use record::{RecordSchema, RecordSpec};
pub use registry::{MetadataResolver, SchemaRegistry};
