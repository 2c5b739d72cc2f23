//! Schema descriptors for document arrays.
//!
//! Provides the element-type descriptors a [`DocSchema`] declares for each
//! path, dotted-path resolution through embedded documents and arrays, and
//! the casting rules that coerce raw JSON values into those types.

pub mod builder;
pub mod cast;
pub mod object_id;
pub mod schema;

pub use builder::SchemaBuilder;
pub use cast::{cast, cast_document, CastFailure};
pub use object_id::{is_object_id, new_object_id};
pub use schema::{DocSchema, FieldDef, SchemaOptions, SchemaType};
