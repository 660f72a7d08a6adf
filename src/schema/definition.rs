//! Declarative schema definitions
//!
//! JSON description of a schema tree, tagged by `"type"`:
//!
//! ```json
//! {
//!   "type": "object",
//!   "strict": true,
//!   "fields": [
//!     { "name": "email", "type": "string", "refine": ["email"], "transform": "lowercase" },
//!     { "name": "page", "type": "integer", "coerce": true, "optional": true },
//!     { "name": "startedOn", "type": "date", "optional": true }
//!   ]
//! }
//! ```
//!
//! Refinements and transforms are referenced by name and resolved through
//! [`crate::refine::lookup`] and [`crate::transform::lookup`]. Compiling a
//! definition also runs [`Schema::check`].

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::compose;
use super::errors::{SchemaError, SchemaResult};
use super::types::{Field, KeyPolicy, Schema};
use crate::factory;
use crate::refine;
use crate::transform;

/// One node of a declarative schema.
///
/// Unknown keys are rejected at parse time, so a misspelled `strict` or
/// `optional` never loosens a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDef {
    #[serde(flatten)]
    pub kind: KindDef,

    #[serde(default, skip_serializing_if = "is_false")]
    pub coerce: bool,

    /// Refinement names, e.g. `"zip"` or `"min_length:3"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refine: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindDef {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Object {
        #[serde(default)]
        fields: Vec<FieldDefinition>,
        /// Reject undeclared keys
        #[serde(default)]
        strict: bool,
        /// Keep undeclared keys in the output (ignored when `strict`)
        #[serde(default)]
        passthrough: bool,
    },
    Array {
        items: Box<SchemaDef>,
    },
    Enum {
        values: Vec<String>,
    },
    Union {
        variants: Vec<SchemaDef>,
    },
    /// `YYYY-MM-DD` normalized to UTC midnight
    Date,
    /// Pagination query over the given sort keys
    Pagination {
        sort_keys: Vec<String>,
    },
    /// `{data: [items], meta}` response envelope
    Paginated {
        items: Box<SchemaDef>,
    },
}

/// A named field inside an object definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(flatten)]
    pub schema: SchemaDef,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Value used when the field is absent. Implies optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Keys every node accepts.
const NODE_KEYS: &[&str] = &["type", "coerce", "refine", "transform", "description"];

/// Extra keys accepted by each `"type"`.
fn kind_keys(kind: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match kind {
        "string" | "number" | "integer" | "boolean" | "null" | "date" => &[],
        "object" => &["fields", "strict", "passthrough"],
        "array" | "paginated" => &["items"],
        "enum" => &["values"],
        "union" => &["variants"],
        "pagination" => &["sort_keys"],
        _ => return None,
    };
    Some(keys)
}

/// Wire shape of [`SchemaDef`], before the key check.
#[derive(Deserialize)]
struct RawSchemaDef {
    #[serde(flatten)]
    kind: KindDef,
    #[serde(default)]
    coerce: bool,
    #[serde(default)]
    refine: Vec<String>,
    #[serde(default)]
    transform: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl<'de> Deserialize<'de> for SchemaDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;

        // Unknown or missing types fall through to the tagged enum's error
        if let Some(kind) = map.get("type").and_then(Value::as_str) {
            if let Some(allowed) = kind_keys(kind) {
                let unknown = map.keys().find(|key| {
                    !NODE_KEYS.contains(&key.as_str()) && !allowed.contains(&key.as_str())
                });
                if let Some(key) = unknown {
                    return Err(de::Error::custom(format!(
                        "unknown key '{}' in {} definition",
                        key, kind
                    )));
                }
            }
        }

        let raw: RawSchemaDef = serde_json::from_value(Value::Object(map))
            .map_err(<D::Error as de::Error>::custom)?;
        Ok(Self {
            kind: raw.kind,
            coerce: raw.coerce,
            refine: raw.refine,
            transform: raw.transform,
            description: raw.description,
        })
    }
}

impl SchemaDef {
    /// Definition of a bare node of the given kind.
    pub fn of(kind: KindDef) -> Self {
        Self {
            kind,
            coerce: false,
            refine: Vec::new(),
            transform: None,
            description: None,
        }
    }

    /// Builds and checks the schema this definition describes.
    pub fn compile(&self) -> SchemaResult<Schema> {
        let schema = self.build()?;
        schema.check()?;
        Ok(schema)
    }

    fn build(&self) -> SchemaResult<Schema> {
        let mut schema = match &self.kind {
            KindDef::String => compose::string(),
            KindDef::Number => compose::number(),
            KindDef::Integer => compose::integer(),
            KindDef::Boolean => compose::boolean(),
            KindDef::Null => compose::null(),
            KindDef::Object {
                fields,
                strict,
                passthrough,
            } => {
                let policy = match (strict, passthrough) {
                    (true, _) => KeyPolicy::Strict,
                    (false, true) => KeyPolicy::Passthrough,
                    (false, false) => KeyPolicy::Strip,
                };
                let fields = fields
                    .iter()
                    .map(FieldDefinition::build)
                    .collect::<SchemaResult<Vec<_>>>()?;
                compose::object(fields, policy)
            }
            KindDef::Array { items } => compose::array(items.build()?),
            KindDef::Enum { values } => compose::enumeration(values.iter().cloned()),
            KindDef::Union { variants } => compose::union(
                variants
                    .iter()
                    .map(SchemaDef::build)
                    .collect::<SchemaResult<Vec<_>>>()?,
            ),
            KindDef::Date => compose::date_only_utc(),
            KindDef::Pagination { sort_keys } => factory::pagination_schema(sort_keys)?,
            KindDef::Paginated { items } => factory::paginated_response_schema(items.build()?),
        };

        if self.coerce {
            schema = schema.coerce();
        }

        for name in &self.refine {
            let rules =
                refine::lookup(name).ok_or_else(|| SchemaError::UnknownRefinement(name.clone()))?;
            schema = schema.refine_all(rules);
        }

        if let Some(name) = &self.transform {
            let step =
                transform::lookup(name).ok_or_else(|| SchemaError::UnknownTransform(name.clone()))?;
            schema = schema.transform(step);
        }

        if let Some(description) = &self.description {
            schema = schema.describe(description.clone());
        }

        Ok(schema)
    }
}

impl FieldDefinition {
    fn build(&self) -> SchemaResult<Field> {
        let schema = self.schema.build()?;
        Ok(match (&self.default, self.optional) {
            (Some(default), _) => Field::with_default(self.name.clone(), schema, default.clone()),
            (None, true) => Field::optional(self.name.clone(), schema),
            (None, false) => Field::required(self.name.clone(), schema),
        })
    }
}
