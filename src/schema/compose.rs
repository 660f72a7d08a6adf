//! Schema composer
//!
//! Free-function builders for schema nodes. Builders never fail; definition
//! mistakes are caught by [`Schema::check`] when a contract is created.

use super::types::{
    ArraySchema, EnumSchema, Field, KeyPolicy, ObjectSchema, PrimitiveKind, Schema, SchemaKind,
};
use crate::refine;
use crate::transform;

pub fn string() -> Schema {
    Schema::from_kind(SchemaKind::Primitive(PrimitiveKind::String))
}

pub fn number() -> Schema {
    Schema::from_kind(SchemaKind::Primitive(PrimitiveKind::Number))
}

pub fn integer() -> Schema {
    Schema::from_kind(SchemaKind::Primitive(PrimitiveKind::Integer))
}

pub fn boolean() -> Schema {
    Schema::from_kind(SchemaKind::Primitive(PrimitiveKind::Boolean))
}

pub fn null() -> Schema {
    Schema::from_kind(SchemaKind::Primitive(PrimitiveKind::Null))
}

/// Object schema over `fields`, in declaration order.
pub fn object(fields: impl IntoIterator<Item = Field>, policy: KeyPolicy) -> Schema {
    Schema::from_kind(SchemaKind::Object(ObjectSchema {
        fields: fields.into_iter().collect(),
        policy,
    }))
}

/// Shorthand for an object that rejects undeclared keys.
pub fn strict_object(fields: impl IntoIterator<Item = Field>) -> Schema {
    object(fields, KeyPolicy::Strict)
}

pub fn array(item: Schema) -> Schema {
    Schema::from_kind(SchemaKind::Array(ArraySchema {
        item: Box::new(item),
    }))
}

/// Closed set of string literals.
pub fn enumeration<I, S>(values: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Schema::from_kind(SchemaKind::Enum(EnumSchema {
        values: values.into_iter().map(Into::into).collect(),
    }))
}

/// First variant that validates wins.
pub fn union(variants: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Union(variants.into_iter().collect()))
}

/// `YYYY-MM-DD` field normalized to a UTC midnight timestamp string.
///
/// The canonical timestamp form is accepted as well, so a validated value
/// validates again to itself.
pub fn date_only_utc() -> Schema {
    union([
        string()
            .refine(refine::date_only())
            .transform(transform::date_only_to_utc()),
        string()
            .refine(refine::utc_midnight())
            .transform(transform::date_only_to_utc()),
    ])
}
