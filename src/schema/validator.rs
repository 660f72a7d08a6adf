//! Schema validator
//!
//! Validation semantics:
//! - Every declared field is checked in one pass; sibling violations are all reported
//! - Strict objects report every undeclared key, not just the first
//! - Coercing leaves parse string input before the type check
//! - Absent optional fields are skipped; absent default fields take the default unvalidated
//! - Refinements run only on structurally valid values, and all of them run
//! - Transforms run only when the node and its whole subtree are valid
//! - Nesting depth and array length are bounded by [`ValidationLimits`], passthrough subtrees included
//!
//! The validator never mutates its input. It returns a normalized copy:
//! coerced primitives, filled defaults, stripped keys, transformed values.

use serde_json::{Map, Number, Value};

use super::errors::{FailureList, Violation};
use super::types::{
    ArraySchema, EnumSchema, KeyPolicy, ObjectSchema, Presence, PrimitiveKind, Schema, SchemaKind,
};
use crate::config::ValidationLimits;

/// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Stateless schema validator.
///
/// Holds only its limits, so one instance can be shared freely across
/// threads and reused for any number of calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    limits: ValidationLimits,
}

impl SchemaValidator {
    /// Creates a new validator with the given limits.
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validates a value against a schema.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in report order: declared fields in
    /// declaration order, then undeclared keys.
    pub fn validate(&self, schema: &Schema, value: &Value) -> Result<Value, FailureList> {
        let mut violations = Vec::new();
        let output = self.validate_node(schema, value, "", 0, &mut violations);

        match (output, FailureList::new(violations)) {
            (_, Some(failures)) => Err(failures),
            (Some(value), None) => Ok(value),
            // A rejected node always records a violation
            (None, None) => Err(FailureList::single(Violation::type_mismatch(
                "",
                schema.type_name(),
                json_type_name(value),
            ))),
        }
    }

    /// Validates one node. Returns `None` iff at least one violation was recorded.
    fn validate_node(
        &self,
        schema: &Schema,
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<Violation>,
    ) -> Option<Value> {
        let structured = match schema.kind() {
            SchemaKind::Primitive(kind) => {
                self.validate_primitive(*kind, schema.coerces(), value, path, out)
            }
            SchemaKind::Object(obj) => self.validate_object(obj, value, path, depth, out),
            SchemaKind::Array(arr) => self.validate_array(arr, value, path, depth, out),
            SchemaKind::Enum(e) => validate_enum(e, value, path, out),
            SchemaKind::Union(variants) => self.validate_union(variants, value, path, depth, out),
        }?;

        let mut refined = true;
        for refinement in schema.refinements() {
            if let Err(message) = refinement.check(&structured) {
                out.push(Violation::refinement(path, message));
                refined = false;
            }
        }
        if !refined {
            return None;
        }

        match schema.transform_step() {
            None => Some(structured),
            Some(transform) => match transform.apply(&structured) {
                Ok(canonical) => Some(canonical),
                Err(message) => {
                    out.push(Violation::transform(path, message));
                    None
                }
            },
        }
    }

    fn validate_primitive(
        &self,
        kind: PrimitiveKind,
        coerce: bool,
        value: &Value,
        path: &str,
        out: &mut Vec<Violation>,
    ) -> Option<Value> {
        let coerced;
        let value = match (coerce, value) {
            (true, Value::String(raw)) => match coerce_str(kind, raw) {
                Some(parsed) => {
                    coerced = parsed;
                    &coerced
                }
                None => {
                    out.push(Violation::coercion(path, kind.type_name(), raw));
                    return None;
                }
            },
            _ => value,
        };

        let accepted = match kind {
            PrimitiveKind::String => value.is_string().then(|| value.clone()),
            PrimitiveKind::Number => value.is_number().then(|| value.clone()),
            PrimitiveKind::Integer => as_integer(value),
            PrimitiveKind::Boolean => value.is_boolean().then(|| value.clone()),
            PrimitiveKind::Null => value.is_null().then_some(Value::Null),
        };

        if accepted.is_none() {
            let actual = match (kind, value) {
                (PrimitiveKind::Integer, Value::Number(_)) => "float",
                _ => json_type_name(value),
            };
            out.push(Violation::type_mismatch(path, kind.type_name(), actual));
        }
        accepted
    }

    fn validate_object(
        &self,
        obj: &ObjectSchema,
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<Violation>,
    ) -> Option<Value> {
        let Some(input) = value.as_object() else {
            out.push(Violation::type_mismatch(path, "object", json_type_name(value)));
            return None;
        };

        let depth = depth + 1;
        if depth > self.limits.max_depth {
            out.push(Violation::depth_exceeded(path, self.limits.max_depth));
            return None;
        }

        let mut output = Map::new();
        let mut valid = true;

        for field in obj.fields() {
            let field_path = make_path(path, field.name());

            match (input.get(field.name()), field.presence()) {
                (Some(field_value), _) => {
                    match self.validate_node(field.schema(), field_value, &field_path, depth, out)
                    {
                        Some(normalized) => {
                            output.insert(field.name().to_string(), normalized);
                        }
                        None => valid = false,
                    }
                }
                (None, Presence::Required) => {
                    out.push(Violation::missing_field(field_path));
                    valid = false;
                }
                (None, Presence::Optional) => {}
                (None, Presence::Default(default)) => {
                    output.insert(field.name().to_string(), default.clone());
                }
            }
        }

        for (key, extra) in input.iter().filter(|(key, _)| !obj.declares(key)) {
            match obj.policy() {
                KeyPolicy::Strict => {
                    out.push(Violation::unknown_key(make_path(path, key), key));
                    valid = false;
                }
                KeyPolicy::Passthrough => {
                    if self.check_limits(extra, &make_path(path, key), depth, out) {
                        output.insert(key.clone(), extra.clone());
                    } else {
                        valid = false;
                    }
                }
                KeyPolicy::Strip => {}
            }
        }

        valid.then_some(Value::Object(output))
    }

    fn validate_array(
        &self,
        arr: &ArraySchema,
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<Violation>,
    ) -> Option<Value> {
        let Some(items) = value.as_array() else {
            out.push(Violation::type_mismatch(path, "array", json_type_name(value)));
            return None;
        };

        let depth = depth + 1;
        if depth > self.limits.max_depth {
            out.push(Violation::depth_exceeded(path, self.limits.max_depth));
            return None;
        }
        if items.len() > self.limits.max_array_len {
            out.push(Violation::too_many_items(path, self.limits.max_array_len));
            return None;
        }

        let mut output = Vec::with_capacity(items.len());
        let mut valid = true;

        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            match self.validate_node(arr.item(), item, &item_path, depth, out) {
                Some(normalized) => output.push(normalized),
                None => valid = false,
            }
        }

        valid.then_some(Value::Array(output))
    }

    /// Walks a subtree kept without a schema and checks it against the limits.
    fn check_limits(
        &self,
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<Violation>,
    ) -> bool {
        if !(value.is_array() || value.is_object()) {
            return true;
        }

        let depth = depth + 1;
        if depth > self.limits.max_depth {
            out.push(Violation::depth_exceeded(path, self.limits.max_depth));
            return false;
        }

        match value {
            Value::Array(items) => {
                if items.len() > self.limits.max_array_len {
                    out.push(Violation::too_many_items(path, self.limits.max_array_len));
                    return false;
                }
                items.iter().enumerate().fold(true, |ok, (i, item)| {
                    self.check_limits(item, &format!("{}[{}]", path, i), depth, out) && ok
                })
            }
            Value::Object(map) => map.iter().fold(true, |ok, (key, item)| {
                self.check_limits(item, &make_path(path, key), depth, out) && ok
            }),
            _ => true,
        }
    }

    /// Tries each variant on a scratch list; the first clean variant wins.
    /// When all fail, the first variant's violations are reported.
    fn validate_union(
        &self,
        variants: &[Schema],
        value: &Value,
        path: &str,
        depth: usize,
        out: &mut Vec<Violation>,
    ) -> Option<Value> {
        let mut first_failure: Option<Vec<Violation>> = None;

        for variant in variants {
            let mut scratch = Vec::new();
            match self.validate_node(variant, value, path, depth, &mut scratch) {
                Some(normalized) if scratch.is_empty() => return Some(normalized),
                _ => {
                    if first_failure.is_none() {
                        first_failure = Some(scratch);
                    }
                }
            }
        }

        match first_failure {
            Some(violations) if !violations.is_empty() => out.extend(violations),
            _ => out.push(Violation::type_mismatch(path, "union", json_type_name(value))),
        }
        None
    }
}

fn validate_enum(
    e: &EnumSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    match value.as_str() {
        Some(s) if e.contains(s) => Some(value.clone()),
        Some(s) => {
            out.push(Violation::invalid_enum(path, e.values(), s));
            None
        }
        None => {
            out.push(Violation::type_mismatch(
                path,
                &super::errors::quote_options(e.values()),
                json_type_name(value),
            ));
            None
        }
    }
}

/// Best-effort parse of a string into `kind`. `None` means unparsable.
fn coerce_str(kind: PrimitiveKind, raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    match kind {
        PrimitiveKind::Number | PrimitiveKind::Integer => {
            if trimmed.is_empty() {
                return None;
            }
            let n: f64 = trimmed.parse().ok()?;
            normalize_number(n)
        }
        PrimitiveKind::Boolean => match trimmed {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        PrimitiveKind::String | PrimitiveKind::Null => None,
    }
}

/// Finite numbers only; whole numbers become JSON integers.
fn normalize_number(n: f64) -> Option<Value> {
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number)
}

fn as_integer(value: &Value) -> Option<Value> {
    let Value::Number(n) = value else {
        return None;
    };
    if n.is_i64() || n.is_u64() {
        return Some(value.clone());
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => Some(Value::from(f as i64)),
        _ => None,
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
///
/// Keys that would read as path syntax (empty, or containing `.`, `[` or
/// `]`) are written as quoted brackets: `a["b.c"]`.
fn make_path(prefix: &str, field: &str) -> String {
    if field.is_empty() || field.contains(['.', '[', ']']) {
        format!("{}[{}]", prefix, Value::from(field))
    } else if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
