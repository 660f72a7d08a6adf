//! Schema node definitions
//!
//! Node kinds:
//! - primitive: string, number, integer, boolean, null
//! - object: ordered field set with a key policy
//! - array: homogeneous items
//! - enum: closed set of string literals
//! - union: first matching variant wins
//!
//! Any node may carry refinements and a transform. Primitive number, integer
//! and boolean leaves may coerce from strings. Nodes are built once and
//! shared read-only afterwards.

use std::collections::HashSet;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ROOT_PATH};
use crate::refine::Refinement;
use crate::transform::Transform;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    /// Any finite number
    Number,
    /// Number without a fractional part
    Integer,
    Boolean,
    Null,
}

impl PrimitiveKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }

    /// Whether string input may be coerced into this kind.
    pub fn is_coercible(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Number | PrimitiveKind::Integer | PrimitiveKind::Boolean
        )
    }
}

/// How an object schema treats keys it does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Every undeclared key is a violation
    Strict,
    /// Undeclared keys are ignored and dropped from the output
    #[default]
    Strip,
    /// Undeclared keys are ignored and kept, unvalidated, in the output
    Passthrough,
}

/// Whether a field must be present.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    /// Absent input is replaced by this value, which is not validated.
    Default(Value),
}

/// A named field of an object schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    schema: Schema,
    presence: Presence,
}

impl Field {
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            presence: Presence::Required,
        }
    }

    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            presence: Presence::Optional,
        }
    }

    pub fn with_default(name: impl Into<String>, schema: Schema, default: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            presence: Presence::Default(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub(crate) fields: Vec<Field>,
    pub(crate) policy: KeyPolicy,
}

impl ObjectSchema {
    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub(crate) item: Box<Schema>,
}

impl ArraySchema {
    pub fn item(&self) -> &Schema {
        &self.item
    }
}

#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub(crate) values: Vec<String>,
}

impl EnumSchema {
    /// Allowed literals, matched exactly and case-sensitively.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.values.iter().any(|v| v == candidate)
    }
}

#[derive(Debug, Clone)]
pub enum SchemaKind {
    Primitive(PrimitiveKind),
    Object(ObjectSchema),
    Array(ArraySchema),
    Enum(EnumSchema),
    Union(Vec<Schema>),
}

/// An immutable schema node.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: SchemaKind,
    coerce: bool,
    refinements: Vec<Refinement>,
    transform: Option<Transform>,
    description: Option<String>,
}

impl Schema {
    pub(crate) fn from_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            coerce: false,
            refinements: Vec::new(),
            transform: None,
            description: None,
        }
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    pub fn coerces(&self) -> bool {
        self.coerce
    }

    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    pub fn transform_step(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parse string input into this primitive before the type check.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Adds a refinement, evaluated after the structural check passes.
    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn refine_all(mut self, refinements: impl IntoIterator<Item = Refinement>) -> Self {
        self.refinements.extend(refinements);
        self
    }

    /// Adds a transform. A second call composes after the first.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(match self.transform.take() {
            Some(existing) => existing.then(transform),
            None => transform,
        });
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Primitive(p) => p.type_name(),
            SchemaKind::Object(_) => "object",
            SchemaKind::Array(_) => "array",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Union(_) => "union",
        }
    }

    /// Validates the schema definition itself (not a value).
    ///
    /// Runs once at startup. Rejects duplicate field names, empty or
    /// duplicated enums, empty unions and coercion on kinds that cannot
    /// coerce.
    pub fn check(&self) -> SchemaResult<()> {
        self.check_at(ROOT_PATH)
    }

    fn check_at(&self, path: &str) -> SchemaResult<()> {
        if self.coerce {
            let coercible = matches!(&self.kind, SchemaKind::Primitive(p) if p.is_coercible());
            if !coercible {
                return Err(SchemaError::InvalidCoercion {
                    path: path.to_string(),
                    kind: self.type_name(),
                });
            }
        }

        match &self.kind {
            SchemaKind::Primitive(_) => Ok(()),
            SchemaKind::Object(obj) => {
                let mut seen = HashSet::new();
                for field in &obj.fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            path: path.to_string(),
                            field: field.name.clone(),
                        });
                    }
                    field.schema.check_at(&child_path(path, &field.name))?;
                }
                Ok(())
            }
            SchemaKind::Array(arr) => arr.item.check_at(&format!("{}[]", path)),
            SchemaKind::Enum(e) => {
                if e.values.is_empty() {
                    return Err(SchemaError::EmptyEnum {
                        path: path.to_string(),
                    });
                }
                let mut seen = HashSet::new();
                for value in &e.values {
                    if !seen.insert(value.as_str()) {
                        return Err(SchemaError::DuplicateEnumValue {
                            path: path.to_string(),
                            value: value.clone(),
                        });
                    }
                }
                Ok(())
            }
            SchemaKind::Union(variants) => {
                if variants.is_empty() {
                    return Err(SchemaError::EmptyUnion {
                        path: path.to_string(),
                    });
                }
                variants.iter().try_for_each(|v| v.check_at(path))
            }
        }
    }
}

fn child_path(path: &str, field: &str) -> String {
    if path == ROOT_PATH {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
