//! Validation failure and schema definition error types
//!
//! Violation kinds:
//! - STRUCTURAL_ERROR: missing required field, unrecognized key, wrong kind
//! - REFINEMENT_ERROR: well-typed value failing a domain predicate
//! - COERCION_ERROR: string that cannot be parsed into the required primitive
//! - TRANSFORM_ERROR: normalization step that could not produce a value
//!
//! Violations are data. They are collected per call and returned together as
//! a [`FailureList`]. [`SchemaError`] is the startup-time counterpart: a
//! malformed schema definition, detected once when the schema is checked.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Path reported for violations on the top-level value.
pub const ROOT_PATH: &str = "$root";

/// Classification of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Structural,
    Refinement,
    Coercion,
    Transform,
}

impl ViolationKind {
    /// Returns the stable code string for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Structural => "STRUCTURAL_ERROR",
            ViolationKind::Refinement => "REFINEMENT_ERROR",
            ViolationKind::Coercion => "COERCION_ERROR",
            ViolationKind::Transform => "TRANSFORM_ERROR",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One `{path, message}` entry of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    path: String,
    message: String,
    kind: ViolationKind,
}

impl Violation {
    /// Creates a violation. An empty path denotes the top-level value.
    pub fn new(kind: ViolationKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                ROOT_PATH.to_string()
            } else {
                path
            },
            message: message.into(),
            kind,
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(ViolationKind::Structural, path, "Required")
    }

    pub fn unknown_key(path: impl Into<String>, key: &str) -> Self {
        Self::new(
            ViolationKind::Structural,
            path,
            format!("Unrecognized key: \"{}\"", key),
        )
    }

    pub fn type_mismatch(path: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(
            ViolationKind::Structural,
            path,
            format!("Expected {}, received {}", expected, actual),
        )
    }

    pub fn invalid_enum(path: impl Into<String>, allowed: &[String], received: &str) -> Self {
        Self::new(
            ViolationKind::Structural,
            path,
            format!(
                "Invalid enum value. Expected {}, received '{}'",
                quote_options(allowed),
                received
            ),
        )
    }

    pub fn depth_exceeded(path: impl Into<String>, max_depth: usize) -> Self {
        Self::new(
            ViolationKind::Structural,
            path,
            format!("Maximum nesting depth of {} exceeded", max_depth),
        )
    }

    pub fn too_many_items(path: impl Into<String>, max_items: usize) -> Self {
        Self::new(
            ViolationKind::Structural,
            path,
            format!("Array must contain at most {} element(s)", max_items),
        )
    }

    pub fn refinement(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Refinement, path, message)
    }

    pub fn coercion(path: impl Into<String>, expected: &str, raw: &str) -> Self {
        Self::new(
            ViolationKind::Coercion,
            path,
            format!("Expected {}, received \"{}\"", expected, raw),
        )
    }

    pub fn transform(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Transform, path, message)
    }

    /// Dot/bracket path of the offending field, or `$root`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Renders enum options as `'a' | 'b'`.
pub(crate) fn quote_options(options: &[String]) -> String {
    options
        .iter()
        .map(|o| format!("'{}'", o))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Ordered, non-empty list of violations from one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureList(Vec<Violation>);

impl FailureList {
    /// Wraps collected violations. Returns `None` when there are none.
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self(violations))
        }
    }

    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Number of violations. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a failure list is never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Paths of all violations, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(Violation::path).collect()
    }

    /// Violations reported at exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.path == path)
    }

    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for FailureList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for FailureList {}

impl IntoIterator for FailureList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FailureList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Malformed schema definition. Raised at startup, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate field '{field}' in object at {path}")]
    DuplicateField { path: String, field: String },

    #[error("enum at {path} declares no values")]
    EmptyEnum { path: String },

    #[error("enum at {path} declares '{value}' more than once")]
    DuplicateEnumValue { path: String, value: String },

    #[error("union at {path} declares no variants")]
    EmptyUnion { path: String },

    #[error("coercion is not supported for {kind} at {path}")]
    InvalidCoercion { path: String, kind: &'static str },

    #[error("pagination requires at least one sort key")]
    EmptySortKeys,

    #[error("unknown refinement '{0}'")]
    UnknownRefinement(String),

    #[error("unknown transform '{0}'")]
    UnknownTransform(String),
}

impl SchemaError {
    /// Returns the stable code string for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateField { .. } => "SCHEMA_DUPLICATE_FIELD",
            SchemaError::EmptyEnum { .. } => "SCHEMA_EMPTY_ENUM",
            SchemaError::DuplicateEnumValue { .. } => "SCHEMA_DUPLICATE_ENUM_VALUE",
            SchemaError::EmptyUnion { .. } => "SCHEMA_EMPTY_UNION",
            SchemaError::InvalidCoercion { .. } => "SCHEMA_INVALID_COERCION",
            SchemaError::EmptySortKeys => "SCHEMA_EMPTY_SORT_KEYS",
            SchemaError::UnknownRefinement(_) => "SCHEMA_UNKNOWN_REFINEMENT",
            SchemaError::UnknownTransform(_) => "SCHEMA_UNKNOWN_TRANSFORM",
        }
    }
}

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;
