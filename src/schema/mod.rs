//! Schema subsystem
//!
//! Schemas are immutable trees built once at startup and shared read-only.
//!
//! # Validation Rules
//!
//! - One pass per call; every violation is collected, none short-circuits siblings
//! - Structural check, then refinements, then transforms
//! - Coercion only on number, integer and boolean leaves
//! - The input value is never mutated
//! - Deterministic violation order

pub mod compose;
mod definition;
mod errors;
mod types;
mod validator;

pub use compose::{
    array, boolean, date_only_utc, enumeration, integer, null, number, object, strict_object,
    string, union,
};
pub use definition::{FieldDefinition, KindDef, SchemaDef};
pub use errors::{FailureList, SchemaError, SchemaResult, Violation, ViolationKind, ROOT_PATH};
pub use types::{
    ArraySchema, EnumSchema, Field, KeyPolicy, ObjectSchema, Presence, PrimitiveKind, Schema,
    SchemaKind,
};
pub use validator::SchemaValidator;
